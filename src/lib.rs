//! zaptv - remote-control navigation and live-channel switching for IPTV
//!
//! A D-pad driven channel browser and live player. The interesting part is
//! the state machinery behind the screens: spatial grid focus, scroll
//! centering, debounced channel switching with stream health recovery,
//! numeric channel entry and the mini-guide overlay.
//!
//! # Modules
//!
//! - `models` - Channels, programs, playback session snapshot
//! - `catalog` - Channel catalog, favorites and EPG collaborators, playlist loading
//! - `nav` - Grid focus, scroll centering, back handling, channel browser
//! - `live` - Channel switcher, health monitor, numeric entry, mini-guide, player
//! - `stream` - Video pipeline and volume boost seams, mpv / VLC pipeline
//! - `api` - Stream URL redirect resolution
//! - `app` - Screen stack and key dispatch
//! - `ui` - Terminal rendering

pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod input;
pub mod live;
pub mod models;
pub mod nav;
pub mod stream;
pub mod timer;
pub mod ui;

// Re-export commonly used types
pub use models::{Channel, ChannelFilter, PlaybackSession, Program, SessionStatus};

pub use api::StreamResolver;
pub use app::{App, AppState, Services};
pub use config::{Config, Timings};
pub use input::{KeyPress, RemoteKey};
pub use live::LivePlayer;
pub use nav::ChannelBrowser;
