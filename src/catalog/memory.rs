//! In-memory channel catalog and favorites

use std::collections::HashSet;

use super::{ChannelCatalog, FavoritesStore};
use crate::models::{Channel, ChannelFilter};

/// Catalog over a playlist held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    channels: Vec<Channel>,
    show_adult: bool,
    revision: u64,
}

impl MemoryCatalog {
    pub fn new(channels: Vec<Channel>, show_adult: bool) -> Self {
        Self {
            channels,
            show_adult,
            revision: 0,
        }
    }

    /// Swap in a freshly loaded playlist
    pub fn replace(&mut self, channels: Vec<Channel>) {
        self.channels = channels;
        self.revision += 1;
    }

    /// Remove a channel by id, returning whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.channels.len();
        self.channels.retain(|c| c.id != id);
        let removed = self.channels.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.visible().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn visible(&self) -> impl Iterator<Item = &Channel> {
        self.channels
            .iter()
            .filter(move |c| self.show_adult || !c.adult)
    }
}

impl ChannelCatalog for MemoryCatalog {
    fn list_by_filter(&self, filter: &ChannelFilter, favorites: &dyn FavoritesStore) -> Vec<Channel> {
        self.visible()
            .filter(|c| match filter {
                ChannelFilter::All => true,
                ChannelFilter::Favorites => favorites.is_favorite(&c.id),
                ChannelFilter::Category(name) => &c.category == name,
            })
            .cloned()
            .collect()
    }

    fn by_number(&self, number: u32) -> Option<Channel> {
        self.visible().find(|c| c.number == number).cloned()
    }

    fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.visible()
            .filter(|c| seen.insert(c.category.as_str()))
            .map(|c| c.category.clone())
            .collect()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Favorites kept for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryFavorites {
    ids: HashSet<String>,
    revision: u64,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a saved list of channel ids
    pub fn with_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            ids: ids.into_iter().collect(),
            revision: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FavoritesStore for MemoryFavorites {
    fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn toggle(&mut self, id: &str) -> bool {
        self.revision += 1;
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
