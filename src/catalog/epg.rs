//! In-memory program guide
//!
//! Schedules come from a JSON object keyed by channel id:
//!
//! ```json
//! { "news-1": [ { "title": "Morning", "start": "2024-05-01T06:00:00Z", "end": "2024-05-01T09:00:00Z" } ] }
//! ```
//!
//! A channel's schedule only becomes visible once it has been requested
//! through `load_channel_epg`, mirroring a provider that fetches per channel.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::EpgProvider;
use crate::models::Program;

/// EPG loading errors
#[derive(Debug, Error)]
pub enum EpgError {
    #[error("Failed to read EPG file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid EPG JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Schedules held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryEpg {
    schedules: HashMap<String, Vec<Program>>,
    loaded: HashSet<String>,
    fetches: usize,
}

impl MemoryEpg {
    pub fn new(schedules: HashMap<String, Vec<Program>>) -> Self {
        let schedules = schedules
            .into_iter()
            .map(|(id, mut programs)| {
                programs.sort_by_key(|p| p.start);
                (id, programs)
            })
            .collect();
        Self {
            schedules,
            loaded: HashSet::new(),
            fetches: 0,
        }
    }

    /// Parse a JSON schedule
    pub fn from_json(json: &str) -> Result<Self, EpgError> {
        let schedules: HashMap<String, Vec<Program>> = serde_json::from_str(json)?;
        Ok(Self::new(schedules))
    }

    /// Read and parse a JSON schedule file
    pub fn load_file(path: &Path) -> Result<Self, EpgError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of schedule fetches actually performed
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    fn schedule(&self, channel_id: &str) -> &[Program] {
        if !self.loaded.contains(channel_id) {
            return &[];
        }
        self.schedules
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl EpgProvider for MemoryEpg {
    fn current_program(&self, channel_id: &str, at: DateTime<Utc>) -> Option<Program> {
        self.schedule(channel_id)
            .iter()
            .find(|p| p.is_live_at(at))
            .cloned()
    }

    fn upcoming_programs(&self, channel_id: &str, at: DateTime<Utc>, limit: usize) -> Vec<Program> {
        self.schedule(channel_id)
            .iter()
            .filter(|p| p.end > at)
            .take(limit)
            .cloned()
            .collect()
    }

    fn load_channel_epg(&mut self, channel_id: &str) {
        if self.loaded.insert(channel_id.to_string()) {
            self.fetches += 1;
            debug!("loaded EPG for {}", channel_id);
        }
    }

    fn is_loaded(&self, channel_id: &str) -> bool {
        self.loaded.contains(channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SCHEDULE: &str = r#"{
        "news": [
            { "title": "Evening", "start": "2024-05-01T18:00:00Z", "end": "2024-05-01T20:00:00Z" },
            { "title": "Morning", "start": "2024-05-01T06:00:00Z", "end": "2024-05-01T09:00:00Z" },
            { "title": "Midday", "start": "2024-05-01T09:00:00Z", "end": "2024-05-01T18:00:00Z",
              "description": "Live coverage" }
        ]
    }"#;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_schedule_hidden_until_loaded() {
        let mut epg = MemoryEpg::from_json(SCHEDULE).unwrap();
        assert!(epg.current_program("news", at(7)).is_none());

        epg.load_channel_epg("news");
        assert_eq!(epg.current_program("news", at(7)).unwrap().title, "Morning");
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut epg = MemoryEpg::from_json(SCHEDULE).unwrap();
        epg.load_channel_epg("news");
        epg.load_channel_epg("news");
        assert_eq!(epg.fetch_count(), 1);
        assert!(epg.is_loaded("news"));
        assert!(!epg.is_loaded("sports"));
    }

    #[test]
    fn test_upcoming_starts_with_current() {
        let mut epg = MemoryEpg::from_json(SCHEDULE).unwrap();
        epg.load_channel_epg("news");

        let upcoming = epg.upcoming_programs("news", at(10), 8);
        let titles: Vec<_> = upcoming.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Midday", "Evening"]);
        assert_eq!(upcoming[0].description.as_deref(), Some("Live coverage"));

        assert_eq!(epg.upcoming_programs("news", at(6), 1).len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(MemoryEpg::from_json("[1, 2"), Err(EpgError::Parse(_))));
    }
}
