//! Debounced channel switching
//!
//! The switcher is the only owner of the video pipeline. A channel request
//! updates the selection right away and arms the debounce timer; only the
//! last request before the timer fires is committed. Committing disposes the
//! old pipeline, resolves the stream URL (unless it is segmented) and builds
//! a new one. Every request and commit takes a fresh generation number so
//! resolve completions from superseded requests are dropped.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::models::Channel;
use crate::stream::{FormatHint, PipelineFactory, PipelineStatus, VideoPipeline};
use crate::timer::Timer;

// Shared across switchers so a completion addressed to a torn-down player
// can never match a later one.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwitchState {
    Idle,
    /// Waiting out the debounce window
    PendingSwitch,
    /// Pipeline being resolved / built / started
    Switching,
    Playing,
    Error(String),
}

/// Pipeline lifecycle events fed to the health monitor
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchEvent {
    Started,
    Failed(String),
}

/// A stream URL waiting for redirect resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub generation: u64,
    pub url: String,
}

pub struct ChannelSwitcher {
    factory: Rc<dyn PipelineFactory>,
    headers: Vec<(String, String)>,
    debounce: Timer,
    state: SwitchState,
    current: Option<Channel>,
    selected_index: usize,
    pipeline: Option<Box<dyn VideoPipeline>>,
    status: PipelineStatus,
    generation: u64,
    awaiting: Option<u64>,
    resolve_queue: Vec<ResolveRequest>,
    volume: f32,
    paused: bool,
    constructions: u64,
}

impl ChannelSwitcher {
    pub fn new(
        factory: Rc<dyn PipelineFactory>,
        headers: Vec<(String, String)>,
        debounce: Duration,
    ) -> Self {
        Self {
            factory,
            headers,
            debounce: Timer::new(debounce),
            state: SwitchState::Idle,
            current: None,
            selected_index: 0,
            pipeline: None,
            status: PipelineStatus::Idle,
            generation: next_generation(),
            awaiting: None,
            resolve_queue: Vec::new(),
            volume: 1.0,
            paused: false,
            constructions: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &SwitchState {
        &self.state
    }

    pub fn current(&self) -> Option<&Channel> {
        self.current.as_ref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Last polled pipeline status
    pub fn status(&self) -> &PipelineStatus {
        &self.status
    }

    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pipelines built since creation
    pub fn constructions(&self) -> u64 {
        self.constructions
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Select `channel` now and commit it once the debounce window passes
    /// without another request
    pub fn request_channel(&mut self, channel: Channel, index: usize, now: Instant) {
        debug!("request {} (index {})", channel.name, index);
        self.current = Some(channel);
        self.selected_index = index;
        self.generation = next_generation();
        self.awaiting = None;
        self.resolve_queue.clear();
        self.debounce.start(now);
        self.state = SwitchState::PendingSwitch;
    }

    /// Commit a pending request without waiting for the debounce timer
    pub fn flush(&mut self) -> Option<SwitchEvent> {
        if self.debounce.is_armed() {
            self.debounce.cancel();
            return self.commit();
        }
        None
    }

    /// Rebuild the pipeline for the current channel immediately
    pub fn rebuild(&mut self) -> Option<SwitchEvent> {
        self.debounce.cancel();
        self.commit()
    }

    /// Advance timers and poll the pipeline
    pub fn tick(&mut self, now: Instant) -> Option<SwitchEvent> {
        if self.debounce.fire(now) {
            return self.commit();
        }
        self.poll()
    }

    /// Feed back a resolved URL. Stale generations are ignored.
    pub fn on_url_resolved(&mut self, generation: u64, url: String) -> Option<SwitchEvent> {
        if self.awaiting != Some(generation) || generation != self.generation {
            debug!("dropping stale resolve (generation {})", generation);
            return None;
        }
        self.awaiting = None;
        self.build(&url)
    }

    /// Hand queued resolve requests to the runtime
    pub fn take_resolve_requests(&mut self) -> Vec<ResolveRequest> {
        std::mem::take(&mut self.resolve_queue)
    }

    // -------------------------------------------------------------------------
    // Pipeline control
    // -------------------------------------------------------------------------

    /// `play()` on the existing pipeline
    pub fn soft_resume(&mut self) -> Option<SwitchEvent> {
        let pipeline = self.pipeline.as_mut()?;
        match pipeline.play() {
            Ok(()) => None,
            Err(e) => Some(SwitchEvent::Failed(e.to_string())),
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        let result = if paused { pipeline.pause() } else { pipeline.play() };
        match result {
            Ok(()) => self.paused = paused,
            Err(e) => warn!("failed to {} stream: {}", if paused { "pause" } else { "resume" }, e),
        }
    }

    /// Base volume (0.0 - 1.0) applied to current and future pipelines
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.set_volume(self.volume);
        }
    }

    /// Enter the terminal error state, releasing the pipeline
    pub fn fail(&mut self, reason: String) {
        error!("giving up on stream: {}", reason);
        self.debounce.cancel();
        self.release();
        self.state = SwitchState::Error(reason);
    }

    /// Cancel everything and dispose the pipeline
    pub fn teardown(&mut self) {
        self.debounce.cancel();
        self.release();
        self.generation = next_generation();
        self.state = SwitchState::Idle;
    }

    fn release(&mut self) {
        if let Some(mut pipeline) = self.pipeline.take() {
            pipeline.dispose();
        }
        self.awaiting = None;
        self.resolve_queue.clear();
        self.status = PipelineStatus::Idle;
        self.paused = false;
    }

    fn commit(&mut self) -> Option<SwitchEvent> {
        let Some(channel) = self.current.clone() else {
            self.state = SwitchState::Idle;
            return None;
        };
        self.release();
        self.generation = next_generation();
        self.state = SwitchState::Switching;
        info!("switching to {} ({})", channel.name, channel.number);

        if FormatHint::from_url(&channel.url).is_segmented() {
            self.build(&channel.url)
        } else {
            self.awaiting = Some(self.generation);
            self.resolve_queue.push(ResolveRequest {
                generation: self.generation,
                url: channel.url,
            });
            None
        }
    }

    fn build(&mut self, url: &str) -> Option<SwitchEvent> {
        let hint = FormatHint::from_url(url);
        match self.factory.create(url, &self.headers, hint) {
            Ok(mut pipeline) => {
                self.constructions += 1;
                pipeline.set_volume(self.volume);
                let started = pipeline.play();
                self.pipeline = Some(pipeline);
                self.status = PipelineStatus::Buffering;
                match started {
                    Ok(()) => None,
                    Err(e) => Some(SwitchEvent::Failed(e.to_string())),
                }
            }
            Err(e) => Some(SwitchEvent::Failed(e.to_string())),
        }
    }

    fn poll(&mut self) -> Option<SwitchEvent> {
        let pipeline = self.pipeline.as_mut()?;
        let status = pipeline.status();
        if status == self.status {
            return None;
        }
        debug!("pipeline {:?} -> {:?}", self.status, status);
        self.status = status;

        match &self.status {
            PipelineStatus::Playing => {
                self.state = SwitchState::Playing;
                Some(SwitchEvent::Started)
            }
            PipelineStatus::Error(reason) => Some(SwitchEvent::Failed(reason.clone())),
            _ => None,
        }
    }
}
