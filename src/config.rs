//! Configuration management for zaptv
//!
//! Handles config file loading and the timing tunables of the
//! navigation core. Config is stored at ~/.config/zaptv/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default user agent sent to stream servers
pub const DEFAULT_USER_AGENT: &str = "zaptv/0.1";

/// Default number of grid columns in the channel browser
pub const DEFAULT_GRID_COLUMNS: usize = 5;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playlist file (M3U or JSON)
    pub playlist: Option<PathBuf>,
    /// EPG schedule file (JSON)
    pub epg: Option<PathBuf>,
    /// Preferred player (mpv, vlc)
    pub player: Option<String>,
    /// User agent for stream requests
    pub user_agent: Option<String>,
    /// Columns in the channel grid
    pub grid_columns: Option<usize>,
    /// Show channels flagged as adult content
    pub show_adult: bool,
    /// Channel ids starred as favorites
    pub favorites: Vec<String>,
    /// Timer tunables
    pub timings: Timings,
}

/// Durations driving every timer of the core, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub debounce_ms: u64,
    pub health_interval_ms: u64,
    pub health_grace_ms: u64,
    pub numeric_entry_ms: u64,
    pub guide_idle_ms: u64,
    pub back_coalesce_ms: u64,
    pub exit_confirm_ms: u64,
    pub scroll_transition_ms: u64,
    pub max_rebuild_attempts: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            health_interval_ms: 10_000,
            health_grace_ms: 3_000,
            numeric_entry_ms: 1_500,
            guide_idle_ms: 8_000,
            back_coalesce_ms: 80,
            exit_confirm_ms: 2_000,
            scroll_transition_ms: 200,
            max_rebuild_attempts: 3,
        }
    }
}

impl Timings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_millis(self.health_interval_ms)
    }

    pub fn health_grace(&self) -> Duration {
        Duration::from_millis(self.health_grace_ms)
    }

    pub fn numeric_entry(&self) -> Duration {
        Duration::from_millis(self.numeric_entry_ms)
    }

    pub fn guide_idle(&self) -> Duration {
        Duration::from_millis(self.guide_idle_ms)
    }

    pub fn back_coalesce(&self) -> Duration {
        Duration::from_millis(self.back_coalesce_ms)
    }

    pub fn exit_confirm(&self) -> Duration {
        Duration::from_millis(self.exit_confirm_ms)
    }

    pub fn scroll_transition(&self) -> Duration {
        Duration::from_millis(self.scroll_transition_ms)
    }
}

impl Config {
    /// Get config file path (~/.config/zaptv/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zaptv").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::parse(&s).unwrap_or_else(|e| {
                tracing::warn!("ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse config from TOML text
    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn grid_columns(&self) -> usize {
        self.grid_columns
            .filter(|&c| c > 0)
            .unwrap_or(DEFAULT_GRID_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.playlist.is_none());
        assert!(!config.show_adult);
        assert_eq!(config.grid_columns(), 5);
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_default_timings() {
        let t = Timings::default();
        assert_eq!(t.debounce(), Duration::from_millis(500));
        assert_eq!(t.health_interval(), Duration::from_secs(10));
        assert_eq!(t.health_grace(), Duration::from_secs(3));
        assert_eq!(t.numeric_entry(), Duration::from_millis(1500));
        assert_eq!(t.guide_idle(), Duration::from_secs(8));
        assert_eq!(t.exit_confirm(), Duration::from_secs(2));
        assert_eq!(t.max_rebuild_attempts, 3);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
            player = "vlc"
            grid_columns = 4
            favorites = ["news-1"]

            [timings]
            debounce_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.player.as_deref(), Some("vlc"));
        assert_eq!(config.grid_columns(), 4);
        assert_eq!(config.favorites, vec!["news-1".to_string()]);
        assert_eq!(config.timings.debounce_ms, 250);
        // Unset timings keep their defaults
        assert_eq!(config.timings.guide_idle_ms, 8_000);
    }

    #[test]
    fn test_zero_columns_falls_back() {
        let config = Config {
            grid_columns: Some(0),
            ..Config::default()
        };
        assert_eq!(config.grid_columns(), DEFAULT_GRID_COLUMNS);
    }
}
