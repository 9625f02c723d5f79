//! Cancellable deadline timers
//!
//! Every timer in the navigation core is a plain deadline owned by the state
//! machine that needs it. Nothing fires on its own: controllers call
//! [`Timer::fire`] from their `tick(now)` and act only when it returns `true`.
//! Cancelling is just dropping the deadline, so a superseded or torn-down
//! timer can never run a stale callback.

use std::time::{Duration, Instant};

/// One-shot timer with a fixed period
#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    deadline: Option<Instant>,
}

impl Timer {
    /// Create a disarmed timer
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer to expire one period after `now`
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    /// Disarm the timer
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left before expiry, `None` when disarmed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns `true` exactly once when the deadline has passed, disarming
    /// the timer
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
