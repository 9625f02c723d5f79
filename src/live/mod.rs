//! Live-channel state machine
//!
//! - `switcher`: debounced channel changes, sole owner of the pipeline
//! - `health`: stall detection and bounded rebuilds
//! - `numeric`: channel-number entry with an inactivity timeout
//! - `guide`: mini-guide overlay
//! - `audio`: volume / mute / boost routing
//! - `player`: the player screen controller tying them together

pub mod audio;
pub mod guide;
pub mod health;
pub mod numeric;
pub mod player;
pub mod switcher;

pub use audio::AudioSession;
pub use guide::{GuideOutcome, MiniGuide, GUIDE_PROGRAMS, GUIDE_VISIBLE_ROWS};
pub use health::{HealthAction, StreamHealthMonitor};
pub use numeric::{NumericEntry, MAX_DIGITS};
pub use player::{LivePlayer, PlayerOutcome};
pub use switcher::{ChannelSwitcher, ResolveRequest, SwitchEvent, SwitchState};
