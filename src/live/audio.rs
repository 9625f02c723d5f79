//! Volume and boost routing
//!
//! The pipeline only takes 0.0 - 1.0. Anything above that goes to the boost
//! service, which is disabled whenever the session is muted.

use std::rc::Rc;
use tracing::debug;

use crate::stream::VolumeBoost;

pub const MAX_VOLUME: f32 = 2.0;
pub const VOLUME_STEP: f32 = 0.1;

pub struct AudioSession {
    volume: f32,
    muted: bool,
    boost: Rc<dyn VolumeBoost>,
}

impl AudioSession {
    pub fn new(boost: Rc<dyn VolumeBoost>) -> Self {
        Self {
            volume: 1.0,
            muted: false,
            boost,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume handed to the pipeline
    pub fn base_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume.min(1.0)
        }
    }

    /// Set the session volume (clamped to 0.0 - 2.0) and return the base
    /// volume for the pipeline
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = volume.clamp(0.0, MAX_VOLUME);
        self.apply()
    }

    pub fn volume_up(&mut self) -> f32 {
        // Round to the step grid so repeated steps land on clean values
        let next = ((self.volume + VOLUME_STEP) * 10.0).round() / 10.0;
        self.set_volume(next)
    }

    pub fn volume_down(&mut self) -> f32 {
        let next = ((self.volume - VOLUME_STEP) * 10.0).round() / 10.0;
        self.set_volume(next)
    }

    pub fn toggle_mute(&mut self) -> f32 {
        self.muted = !self.muted;
        self.apply()
    }

    /// Push the boost state out and return the base volume
    pub fn apply(&self) -> f32 {
        if !self.muted && self.volume > 1.0 {
            self.boost.set_boost(self.volume);
        } else {
            self.boost.disable_boost();
        }
        let base = self.base_volume();
        debug!("volume {:.2} (base {:.2}, muted {})", self.volume, base, self.muted);
        base
    }

    /// Drop the boost when the session ends
    pub fn release(&self) {
        self.boost.disable_boost();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::LoggingBoost;

    #[test]
    fn test_boost_above_unity() {
        let boost = Rc::new(LoggingBoost::new());
        let mut audio = AudioSession::new(boost.clone());

        assert_eq!(audio.set_volume(1.5), 1.0);
        assert_eq!(boost.level(), Some(1.5));

        assert_eq!(audio.toggle_mute(), 0.0);
        assert_eq!(boost.level(), None);

        assert_eq!(audio.toggle_mute(), 1.0);
        assert_eq!(boost.level(), Some(1.5));
    }

    #[test]
    fn test_volume_clamped() {
        let boost = Rc::new(LoggingBoost::new());
        let mut audio = AudioSession::new(boost.clone());
        audio.set_volume(5.0);
        assert_eq!(audio.volume(), MAX_VOLUME);
        audio.set_volume(-1.0);
        assert_eq!(audio.volume(), 0.0);
        assert_eq!(boost.level(), None);
    }

    #[test]
    fn test_steps() {
        let boost = Rc::new(LoggingBoost::new());
        let mut audio = AudioSession::new(boost);
        audio.volume_up();
        audio.volume_up();
        assert!((audio.volume() - 1.2).abs() < 1e-6);
        audio.volume_down();
        assert!((audio.volume() - 1.1).abs() < 1e-6);
    }
}
