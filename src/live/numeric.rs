//! Numeric channel entry
//!
//! Digits accumulate into a short buffer. Each digit restarts the inactivity
//! timer, so only a full pause resolves the number, however fast it was typed.

use std::time::{Duration, Instant};

use crate::timer::Timer;

/// Longest channel number that can be typed
pub const MAX_DIGITS: usize = 3;

#[derive(Debug, Clone)]
pub struct NumericEntry {
    buffer: String,
    timer: Timer,
}

impl NumericEntry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            buffer: String::with_capacity(MAX_DIGITS),
            timer: Timer::new(timeout),
        }
    }

    /// Feed one digit (0-9). Digits past the third are dropped but still
    /// count as activity.
    pub fn on_digit(&mut self, digit: u8, now: Instant) {
        self.timer.cancel();
        if digit <= 9 && self.buffer.len() < MAX_DIGITS {
            self.buffer.push(char::from(b'0' + digit));
        }
        self.timer.start(now);
    }

    /// The typed number once the inactivity window has passed. The buffer
    /// is cleared whether or not a channel matches.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        if !self.timer.fire(now) {
            return None;
        }
        let number = self.buffer.parse().ok();
        self.buffer.clear();
        number
    }

    /// Digits typed so far, for the on-screen indicator
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_active(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_resolves_after_trailing_pause() {
        let base = Instant::now();
        let mut entry = NumericEntry::new(ms(1500));

        entry.on_digit(2, base);
        entry.on_digit(0, base + ms(1000));
        entry.on_digit(4, base + ms(2000));
        assert_eq!(entry.tick(base + ms(3000)), None);
        assert_eq!(entry.buffer(), "204");

        assert_eq!(entry.tick(base + ms(3500)), Some(204));
        assert_eq!(entry.tick(base + ms(9000)), None);
        assert!(!entry.is_active());
    }

    #[test]
    fn test_fourth_digit_ignored() {
        let base = Instant::now();
        let mut entry = NumericEntry::new(ms(1500));
        for (i, d) in [1, 2, 3, 4].into_iter().enumerate() {
            entry.on_digit(d, base + ms(100 * i as u64));
        }
        assert_eq!(entry.buffer(), "123");
        // The ignored digit still pushed the deadline
        assert_eq!(entry.tick(base + ms(1700)), None);
        assert_eq!(entry.tick(base + ms(1800)), Some(123));
    }

    #[test]
    fn test_clear_cancels_timer() {
        let base = Instant::now();
        let mut entry = NumericEntry::new(ms(1500));
        entry.on_digit(7, base);
        entry.clear();
        assert_eq!(entry.tick(base + ms(5000)), None);
    }
}
