//! Volume boost service
//!
//! The real amplifier lives in the platform audio stack; this implementation
//! tracks the requested level and reports it through `tracing`.

use std::cell::Cell;
use tracing::info;

use super::VolumeBoost;

/// Boost service that remembers and logs the active level
#[derive(Debug, Default)]
pub struct LoggingBoost {
    level: Cell<Option<f32>>,
}

impl LoggingBoost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently engaged boost level, if any
    pub fn level(&self) -> Option<f32> {
        self.level.get()
    }
}

impl VolumeBoost for LoggingBoost {
    fn set_boost(&self, level: f32) {
        if self.level.get() != Some(level) {
            info!("volume boost engaged at {:.0}%", level * 100.0);
        }
        self.level.set(Some(level));
    }

    fn disable_boost(&self) {
        if self.level.take().is_some() {
            info!("volume boost disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_tracks_level() {
        let boost = LoggingBoost::new();
        assert_eq!(boost.level(), None);

        boost.set_boost(1.5);
        assert_eq!(boost.level(), Some(1.5));

        boost.disable_boost();
        assert_eq!(boost.level(), None);
    }
}
