//! Video pipeline seam
//!
//! - `VideoPipeline` / `PipelineFactory`: the decoder the player screen drives
//! - `VolumeBoost`: native gain stage for volume above 100%
//! - `player`: pipeline backed by an external mpv / VLC process
//! - `boost`: boost service that records requests through `tracing`

pub mod boost;
pub mod player;

use std::time::Duration;
use thiserror::Error;

pub use boost::LoggingBoost;
pub use player::{PlayerType, ProcessPipeline, ProcessPipelineFactory};

/// State reported by a running pipeline
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineStatus {
    #[default]
    Idle,
    Buffering,
    Playing,
    Paused,
    /// Stopped without being asked to
    Stopped,
    Error(String),
}

impl PipelineStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, PipelineStatus::Playing)
    }
}

/// Container format inferred from a stream URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Hls,
    MpegTs,
    Dash,
    Progressive,
}

impl FormatHint {
    /// Infer the format from the URL path, ignoring query and fragment
    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or(url)
            .to_ascii_lowercase();

        if path.ends_with(".m3u8") || path.ends_with(".m3u") {
            FormatHint::Hls
        } else if path.ends_with(".ts") {
            FormatHint::MpegTs
        } else if path.ends_with(".mpd") {
            FormatHint::Dash
        } else {
            FormatHint::Progressive
        }
    }

    /// Segmented and transport-stream URLs are never redirect-resolved
    pub fn is_segmented(&self) -> bool {
        !matches!(self, FormatHint::Progressive)
    }
}

/// Errors from video pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Failed to control player: {0}")]
    Control(std::io::Error),
    #[error("Operation not supported by this pipeline: {0}")]
    Unsupported(&'static str),
    #[error("Pipeline already disposed")]
    Disposed,
}

/// A constructed decode/render pipeline for one stream
pub trait VideoPipeline {
    fn play(&mut self) -> Result<(), PipelineError>;
    fn pause(&mut self) -> Result<(), PipelineError>;
    fn seek(&mut self, position: Duration) -> Result<(), PipelineError>;
    /// Base volume, 0.0 - 1.0
    fn set_volume(&mut self, volume: f32);
    fn status(&mut self) -> PipelineStatus;
    /// Release the pipeline; further calls are no-ops or `Disposed`
    fn dispose(&mut self);
}

/// Builds pipelines; only the channel switcher calls this
pub trait PipelineFactory {
    fn create(
        &self,
        url: &str,
        headers: &[(String, String)],
        hint: FormatHint,
    ) -> Result<Box<dyn VideoPipeline>, PipelineError>;
}

/// Secondary amplification stage, independent of the pipeline volume
pub trait VolumeBoost {
    /// Engage the boost at `level` (> 1.0)
    fn set_boost(&self, level: f32);
    fn disable_boost(&self);
}
