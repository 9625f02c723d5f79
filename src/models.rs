//! Data structures shared across the navigation core
//!
//! - **Channels**: catalog entries and the filters that select them
//! - **Guide**: EPG programs shown by the mini-guide
//! - **Playback**: the render-facing snapshot of a live session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Channel Models
// =============================================================================

/// A live channel as loaded from the playlist
///
/// Immutable once loaded. The navigation core refers to channels by their
/// position in a filtered list, never by owning the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    /// Ordinal number used for numeric entry
    pub number: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub url: String,
    #[serde(default)]
    pub adult: bool,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3} {}", self.number, self.name)
    }
}

/// Which channels the browser shows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum ChannelFilter {
    #[default]
    All,
    Favorites,
    Category(String),
}

impl ChannelFilter {
    /// Label shown in the sidebar
    pub fn label(&self) -> &str {
        match self {
            ChannelFilter::All => "All Channels",
            ChannelFilter::Favorites => "Favorites",
            ChannelFilter::Category(name) => name,
        }
    }
}

impl fmt::Display for ChannelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Guide Models
// =============================================================================

/// A scheduled program from the EPG
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Program {
    /// True if the program is on air at `at`
    pub fn is_live_at(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Elapsed fraction (0.0 - 1.0) at `at`
    pub fn progress(&self, at: DateTime<Utc>) -> f64 {
        let total = (self.end - self.start).num_seconds();
        if total <= 0 {
            return 0.0;
        }
        let elapsed = (at - self.start).num_seconds();
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.title
        )
    }
}

// =============================================================================
// Playback Models
// =============================================================================

/// Coarse status of the live session, as shown to the user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    /// A channel change is waiting out the debounce window
    Pending,
    Buffering,
    Playing,
    Paused,
    /// Retries exhausted; the user can retry manually or go back
    Error(String),
}

impl SessionStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, SessionStatus::Error(_))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "Idle"),
            SessionStatus::Pending => write!(f, "Tuning..."),
            SessionStatus::Buffering => write!(f, "Buffering..."),
            SessionStatus::Playing => write!(f, "Live"),
            SessionStatus::Paused => write!(f, "Paused"),
            SessionStatus::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Snapshot of the player session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSession {
    pub channel: Option<Channel>,
    pub retry_count: u32,
    pub status: SessionStatus,
    /// 0.0 - 2.0; above 1.0 the boost stage is engaged
    pub volume: f32,
    pub muted: bool,
}

impl PlaybackSession {
    /// Volume as a whole percentage (0 - 200)
    pub fn volume_percent(&self) -> u16 {
        (self.volume * 100.0).round() as u16
    }

    pub fn is_boosted(&self) -> bool {
        !self.muted && self.volume > 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn program(start_h: u32, end_h: u32) -> Program {
        Program {
            title: "News".into(),
            start: Utc.with_ymd_and_hms(2024, 5, 1, start_h, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 5, 1, end_h, 0, 0).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_program_live_window() {
        let p = program(10, 12);
        assert!(p.is_live_at(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()));
        assert!(p.is_live_at(Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap()));
        assert!(!p.is_live_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_program_progress() {
        let p = program(10, 12);
        let half = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        assert!((p.progress(half) - 0.5).abs() < 1e-9);
        let after = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        assert_eq!(p.progress(after), 1.0);
    }

    #[test]
    fn test_program_display() {
        assert_eq!(program(10, 12).to_string(), "10:00-12:00 News");
    }

    #[test]
    fn test_filter_labels() {
        assert_eq!(ChannelFilter::All.label(), "All Channels");
        assert_eq!(ChannelFilter::Favorites.to_string(), "Favorites");
        assert_eq!(ChannelFilter::Category("Sports".into()).label(), "Sports");
    }

    #[test]
    fn test_session_volume_percent() {
        let session = PlaybackSession {
            channel: None,
            retry_count: 0,
            status: SessionStatus::Idle,
            volume: 1.5,
            muted: false,
        };
        assert_eq!(session.volume_percent(), 150);
        assert!(session.is_boosted());
    }
}
