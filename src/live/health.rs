//! Stream health monitoring
//!
//! Two kinds of trouble reach the monitor. A stall (the pipeline stopped
//! without reporting an error) is noticed on the periodic check and answered
//! with a soft resume, escalating to a rebuild if playback has not come back
//! after the grace delay. A reported error goes straight to a rebuild.
//! Rebuilds are bounded per channel change; once exhausted the monitor gives
//! up and stays quiet until reset. A pipeline reporting that it started does
//! not clear the count by itself: a stream that dies right after starting
//! would otherwise be rebuilt forever. Only a full check interval of
//! uninterrupted playback counts as recovered.

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::switcher::SwitchEvent;
use crate::timer::Timer;

/// What the player should do about the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthAction {
    None,
    /// Call `play()` on the existing pipeline
    SoftResume,
    /// Tear the pipeline down and build it again for the same channel
    Rebuild,
    /// Retries exhausted, surface a terminal error
    GiveUp,
}

#[derive(Debug, Clone)]
pub struct StreamHealthMonitor {
    check: Timer,
    grace: Timer,
    /// Armed by a start; firing means playback held up
    stable: Timer,
    attempts: u32,
    max_attempts: u32,
    gave_up: bool,
}

impl StreamHealthMonitor {
    pub fn new(interval: Duration, grace: Duration, max_attempts: u32) -> Self {
        Self {
            check: Timer::new(interval),
            grace: Timer::new(grace),
            stable: Timer::new(interval),
            attempts: 0,
            max_attempts,
            gave_up: false,
        }
    }

    /// Rebuilds spent on the current channel change
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn has_given_up(&self) -> bool {
        self.gave_up
    }

    /// Start over for a new channel change (or a manual retry)
    pub fn reset(&mut self, now: Instant) {
        self.attempts = 0;
        self.gave_up = false;
        self.grace.cancel();
        self.stable.cancel();
        self.check.start(now);
    }

    /// Cancel every timer
    pub fn stop(&mut self) {
        self.check.cancel();
        self.grace.cancel();
        self.stable.cancel();
    }

    /// React to a pipeline start or failure
    pub fn on_event(&mut self, event: &SwitchEvent, now: Instant) -> HealthAction {
        match event {
            SwitchEvent::Started => {
                self.grace.cancel();
                if !self.gave_up {
                    self.check.start(now);
                    if self.attempts > 0 {
                        self.stable.start(now);
                    }
                }
                HealthAction::None
            }
            SwitchEvent::Failed(reason) => {
                warn!("stream failed: {}", reason);
                self.escalate(now)
            }
        }
    }

    /// Periodic check. `stalled` is true when a pipeline exists and is
    /// neither playing, buffering, in error nor paused by the user.
    pub fn tick(&mut self, now: Instant, stalled: bool) -> HealthAction {
        if self.gave_up {
            return HealthAction::None;
        }

        if self.grace.fire(now) {
            if stalled {
                debug!("still stalled after soft resume");
                return self.escalate(now);
            }
            return HealthAction::None;
        }

        if self.stable.fire(now) && !stalled {
            debug!("stream recovered after {} rebuild(s)", self.attempts);
            self.attempts = 0;
        }

        if self.check.fire(now) {
            self.check.start(now);
            if stalled && !self.grace.is_armed() {
                debug!("stream stalled, trying soft resume");
                self.grace.start(now);
                return HealthAction::SoftResume;
            }
        }
        HealthAction::None
    }

    fn escalate(&mut self, now: Instant) -> HealthAction {
        if self.gave_up {
            return HealthAction::None;
        }
        self.grace.cancel();
        self.stable.cancel();
        if self.attempts >= self.max_attempts {
            self.gave_up = true;
            self.check.cancel();
            return HealthAction::GiveUp;
        }
        self.attempts += 1;
        self.check.start(now);
        warn!("rebuilding stream (attempt {}/{})", self.attempts, self.max_attempts);
        HealthAction::Rebuild
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn monitor() -> StreamHealthMonitor {
        StreamHealthMonitor::new(secs(10), secs(3), 3)
    }

    #[test]
    fn test_stall_soft_resume_then_rebuild() {
        let base = Instant::now();
        let mut m = monitor();
        m.reset(base);

        assert_eq!(m.tick(base + secs(5), true), HealthAction::None);
        assert_eq!(m.tick(base + secs(10), true), HealthAction::SoftResume);
        assert_eq!(m.tick(base + secs(12), true), HealthAction::None);
        assert_eq!(m.tick(base + secs(13), true), HealthAction::Rebuild);
        assert_eq!(m.attempts(), 1);
    }

    #[test]
    fn test_soft_resume_recovers() {
        let base = Instant::now();
        let mut m = monitor();
        m.reset(base);

        assert_eq!(m.tick(base + secs(10), true), HealthAction::SoftResume);
        assert_eq!(m.tick(base + secs(13), false), HealthAction::None);
        assert_eq!(m.attempts(), 0);
    }

    #[test]
    fn test_healthy_stream_never_acts() {
        let base = Instant::now();
        let mut m = monitor();
        m.reset(base);
        for s in 1..60 {
            assert_eq!(m.tick(base + secs(s), false), HealthAction::None);
        }
    }

    #[test]
    fn test_gives_up_after_three_rebuilds() {
        let base = Instant::now();
        let mut m = monitor();
        m.reset(base);
        let failed = SwitchEvent::Failed("decode error".into());

        assert_eq!(m.on_event(&failed, base), HealthAction::Rebuild);
        assert_eq!(m.on_event(&failed, base), HealthAction::Rebuild);
        assert_eq!(m.on_event(&failed, base), HealthAction::Rebuild);
        assert_eq!(m.on_event(&failed, base), HealthAction::GiveUp);
        assert!(m.has_given_up());
        assert_eq!(m.on_event(&failed, base), HealthAction::None);
        assert_eq!(m.tick(base + secs(30), true), HealthAction::None);

        m.reset(base + secs(31));
        assert_eq!(m.attempts(), 0);
        assert!(!m.has_given_up());
    }

    #[test]
    fn test_attempts_clear_only_after_playback_holds() {
        let base = Instant::now();
        let mut m = monitor();
        m.reset(base);
        m.on_event(&SwitchEvent::Failed("x".into()), base);
        m.on_event(&SwitchEvent::Started, base + secs(1));
        assert_eq!(m.attempts(), 1);

        assert_eq!(m.tick(base + secs(10), false), HealthAction::None);
        assert_eq!(m.attempts(), 1);
        assert_eq!(m.tick(base + secs(11), false), HealthAction::None);
        assert_eq!(m.attempts(), 0);
    }

    #[test]
    fn test_start_then_immediate_failure_keeps_counting() {
        let base = Instant::now();
        let mut m = monitor();
        m.reset(base);
        let failed = SwitchEvent::Failed("player exited with 1".into());

        for _ in 0..3 {
            assert_eq!(m.on_event(&failed, base), HealthAction::Rebuild);
            assert_eq!(m.on_event(&SwitchEvent::Started, base), HealthAction::None);
        }
        assert_eq!(m.on_event(&failed, base), HealthAction::GiveUp);
        // The stability window died with the failure
        assert_eq!(m.tick(base + secs(20), false), HealthAction::None);
        assert_eq!(m.attempts(), 3);
    }
}
