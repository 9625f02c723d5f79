//! Back key handling
//!
//! Remotes repeat the back key while it is held, so every back press first
//! goes through [`BackDebouncer`]. The home screen layers [`ExitConfirm`] on
//! top: the first accepted press warns, a second one inside the window exits.

use std::time::{Duration, Instant};

/// Coalesces repeated back events from one physical press
#[derive(Debug, Clone)]
pub struct BackDebouncer {
    window: Duration,
    last_processed: Option<Instant>,
}

impl BackDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_processed: None,
        }
    }

    /// Returns `true` if this back event should be acted on
    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_processed {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_processed = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_processed = None;
    }
}

/// Result of a back press on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// First press: show "press back again to exit"
    Warn,
    /// Second press inside the window
    Exit,
}

/// Two-phase exit confirmation
#[derive(Debug, Clone)]
pub struct ExitConfirm {
    window: Duration,
    armed_at: Option<Instant>,
}

impl ExitConfirm {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed_at: None,
        }
    }

    pub fn press(&mut self, now: Instant) -> ExitDecision {
        match self.armed_at {
            Some(at) if now.saturating_duration_since(at) < self.window => {
                self.armed_at = None;
                ExitDecision::Exit
            }
            _ => {
                self.armed_at = Some(now);
                ExitDecision::Warn
            }
        }
    }

    /// True while the warning should be shown
    pub fn is_warning(&self, now: Instant) -> bool {
        self.armed_at
            .map(|at| now.saturating_duration_since(at) < self.window)
            .unwrap_or(false)
    }

    pub fn reset(&mut self) {
        self.armed_at = None;
    }
}
