//! Channel, favorites and guide collaborators
//!
//! The navigation core only sees these traits. In-memory implementations
//! back the binary and the tests:
//! - `memory`: `MemoryCatalog`, `MemoryFavorites`
//! - `epg`: `MemoryEpg` loaded from a JSON schedule
//! - `playlist`: M3U / JSON playlist parsing

pub mod epg;
pub mod memory;
pub mod playlist;

use chrono::{DateTime, Utc};

use crate::models::{Channel, ChannelFilter, Program};

pub use epg::{EpgError, MemoryEpg};
pub use memory::{MemoryCatalog, MemoryFavorites};
pub use playlist::PlaylistError;

/// Owner of the loaded channel list
pub trait ChannelCatalog {
    /// Ordered channels matching `filter`
    fn list_by_filter(&self, filter: &ChannelFilter, favorites: &dyn FavoritesStore) -> Vec<Channel>;
    /// Channel with ordinal number `number`
    fn by_number(&self, number: u32) -> Option<Channel>;
    /// Category names in playlist order
    fn categories(&self) -> Vec<String>;
    /// Bumped on every mutation of the underlying list
    fn revision(&self) -> u64;
}

/// Favorite channel ids
pub trait FavoritesStore {
    fn is_favorite(&self, id: &str) -> bool;
    /// Flip the favorite flag, returning the new value
    fn toggle(&mut self, id: &str) -> bool;
    /// Bumped on every toggle
    fn revision(&self) -> u64;
}

/// Electronic program guide
pub trait EpgProvider {
    fn current_program(&self, channel_id: &str, at: DateTime<Utc>) -> Option<Program>;
    /// The program on air at `at` followed by later ones, at most `limit`
    fn upcoming_programs(&self, channel_id: &str, at: DateTime<Utc>, limit: usize) -> Vec<Program>;
    /// Request the schedule of a channel; a no-op when already cached
    fn load_channel_epg(&mut self, channel_id: &str);
    fn is_loaded(&self, channel_id: &str) -> bool;
}
