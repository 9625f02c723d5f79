//! Live player screen controller
//!
//! Composes the switcher, health monitor, numeric entry, mini-guide and
//! audio session. Keys and timer ticks come in through `handle_key` and
//! `tick`; the render layer reads `session()` and the overlay accessors.
//! After `teardown` every entry point is a no-op.

use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::audio::AudioSession;
use super::guide::{GuideOutcome, MiniGuide};
use super::health::{HealthAction, StreamHealthMonitor};
use super::numeric::NumericEntry;
use super::switcher::{ChannelSwitcher, ResolveRequest, SwitchEvent, SwitchState};
use crate::app::Services;
use crate::config::Timings;
use crate::input::{KeyPress, RemoteKey};
use crate::models::{Channel, ChannelFilter, PlaybackSession, SessionStatus};
use crate::nav::{BackDebouncer, Direction};
use crate::stream::PipelineStatus;

/// What the app should do after a player key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOutcome {
    Stay,
    /// Leave the player screen (already torn down)
    Exit,
}

pub struct LivePlayer {
    channels: Vec<Channel>,
    switcher: ChannelSwitcher,
    health: StreamHealthMonitor,
    numeric: NumericEntry,
    guide: MiniGuide,
    audio: AudioSession,
    back: BackDebouncer,
    last_failure: Option<String>,
    alive: bool,
}

impl LivePlayer {
    /// Mount the player on `channels[index]` and start playback right away
    pub fn new(
        channels: Vec<Channel>,
        index: usize,
        services: &Services,
        timings: &Timings,
        headers: Vec<(String, String)>,
        now: Instant,
    ) -> Self {
        let mut player = Self {
            channels,
            switcher: ChannelSwitcher::new(services.pipelines.clone(), headers, timings.debounce()),
            health: StreamHealthMonitor::new(
                timings.health_interval(),
                timings.health_grace(),
                timings.max_rebuild_attempts,
            ),
            numeric: NumericEntry::new(timings.numeric_entry()),
            guide: MiniGuide::new(timings.guide_idle()),
            audio: AudioSession::new(services.boost.clone()),
            back: BackDebouncer::new(timings.back_coalesce()),
            last_failure: None,
            alive: true,
        };
        let base = player.audio.apply();
        player.switcher.set_volume(base);
        if player.request_index(index, now) {
            let event = player.switcher.flush();
            player.handle_event(event, now);
        }
        player
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn selected_index(&self) -> usize {
        self.switcher.selected_index()
    }

    pub fn switch_state(&self) -> &SwitchState {
        self.switcher.state()
    }

    pub fn guide(&self) -> &MiniGuide {
        &self.guide
    }

    /// Digits typed so far
    pub fn numeric_buffer(&self) -> &str {
        self.numeric.buffer()
    }

    /// Pipelines built since mount
    pub fn constructions(&self) -> u64 {
        self.switcher.constructions()
    }

    /// Render snapshot
    pub fn session(&self) -> PlaybackSession {
        let status = match self.switcher.state() {
            SwitchState::Idle => SessionStatus::Idle,
            SwitchState::PendingSwitch => SessionStatus::Pending,
            SwitchState::Switching => SessionStatus::Buffering,
            SwitchState::Playing if self.switcher.is_paused() => SessionStatus::Paused,
            SwitchState::Playing => SessionStatus::Playing,
            SwitchState::Error(reason) => SessionStatus::Error(reason.clone()),
        };
        PlaybackSession {
            channel: self.switcher.current().cloned(),
            retry_count: self.health.attempts(),
            status,
            volume: self.audio.volume(),
            muted: self.audio.is_muted(),
        }
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_key(&mut self, press: KeyPress, now: Instant, services: &mut Services) -> PlayerOutcome {
        if !self.alive {
            return PlayerOutcome::Exit;
        }

        if press.key == RemoteKey::Back {
            if !self.back.accept(now) {
                return PlayerOutcome::Stay;
            }
            if self.guide.is_visible() {
                self.guide.hide();
                return PlayerOutcome::Stay;
            }
            self.teardown();
            return PlayerOutcome::Exit;
        }

        if self.guide.is_visible() {
            self.guide_key(press.key, now, services);
            return PlayerOutcome::Stay;
        }

        if matches!(self.switcher.state(), SwitchState::Error(_)) {
            if press.key == RemoteKey::Select {
                self.retry(now);
            }
            return PlayerOutcome::Stay;
        }

        match press.key {
            RemoteKey::Up | RemoteKey::ChannelUp => self.zap(1, now),
            RemoteKey::Down | RemoteKey::ChannelDown => self.zap(-1, now),
            RemoteKey::Digit(d) => self.numeric.on_digit(d, now),
            RemoteKey::Select | RemoteKey::Guide => {
                let index = self.switcher.selected_index();
                self.guide
                    .open(index, &self.channels, &mut *services.epg, Utc::now(), now);
            }
            RemoteKey::VolumeUp => {
                let base = self.audio.volume_up();
                self.switcher.set_volume(base);
            }
            RemoteKey::VolumeDown => {
                let base = self.audio.volume_down();
                self.switcher.set_volume(base);
            }
            RemoteKey::Mute => {
                let base = self.audio.toggle_mute();
                self.switcher.set_volume(base);
            }
            RemoteKey::PlayPause => {
                let paused = !self.switcher.is_paused();
                self.switcher.set_paused(paused);
            }
            _ => {}
        }
        PlayerOutcome::Stay
    }

    fn guide_key(&mut self, key: RemoteKey, now: Instant, services: &mut Services) {
        match key {
            RemoteKey::Left | RemoteKey::Right => {
                if let Some(direction) = key.direction() {
                    self.guide
                        .move_channel(direction, &self.channels, &mut *services.epg, Utc::now(), now);
                }
            }
            RemoteKey::Up => self.guide.move_program(Direction::Up, now),
            RemoteKey::Down => self.guide.move_program(Direction::Down, now),
            RemoteKey::Select | RemoteKey::Guide => {
                if let GuideOutcome::Commit(index) = self.guide.confirm() {
                    if index != self.switcher.selected_index() {
                        self.request_index(index, now);
                        let event = self.switcher.flush();
                        self.handle_event(event, now);
                    }
                }
            }
            _ => {}
        }
    }

    fn zap(&mut self, delta: isize, now: Instant) {
        let len = self.channels.len() as isize;
        if len == 0 {
            return;
        }
        let index = (self.switcher.selected_index() as isize + delta).rem_euclid(len);
        self.request_index(index as usize, now);
    }

    /// Funnel every channel change through the switcher
    fn request_index(&mut self, index: usize, now: Instant) -> bool {
        let Some(channel) = self.channels.get(index).cloned() else {
            return false;
        };
        self.last_failure = None;
        self.health.reset(now);
        self.switcher.request_channel(channel, index, now);
        true
    }

    /// Manual retry from the error state
    pub fn retry(&mut self, now: Instant) {
        if !self.alive {
            return;
        }
        info!("manual retry");
        self.last_failure = None;
        self.health.reset(now);
        let event = self.switcher.rebuild();
        self.handle_event(event, now);
    }

    // -------------------------------------------------------------------------
    // Timers and completions
    // -------------------------------------------------------------------------

    pub fn tick(&mut self, now: Instant, services: &Services) {
        if !self.alive {
            return;
        }

        if let Some(number) = self.numeric.tick(now) {
            self.tune_number(number, now, services);
        }

        if let GuideOutcome::Commit(index) = self.guide.tick(now, self.switcher.selected_index()) {
            self.request_index(index, now);
        }

        let event = self.switcher.tick(now);
        self.handle_event(event, now);

        let action = self.health.tick(now, self.is_stalled());
        let event = self.apply(action);
        self.handle_event(event, now);
    }

    /// Feed back a resolved stream URL
    pub fn on_url_resolved(&mut self, generation: u64, url: String, now: Instant) {
        if !self.alive {
            return;
        }
        let event = self.switcher.on_url_resolved(generation, url);
        self.handle_event(event, now);
    }

    pub fn take_resolve_requests(&mut self) -> Vec<ResolveRequest> {
        if !self.alive {
            return Vec::new();
        }
        self.switcher.take_resolve_requests()
    }

    /// Cancel every timer, dispose the pipeline and drop the boost
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.switcher.teardown();
        self.health.stop();
        self.numeric.clear();
        self.guide.hide();
        self.audio.release();
        debug!("player torn down");
    }

    fn tune_number(&mut self, number: u32, now: Instant, services: &Services) {
        if let Some(index) = self.channels.iter().position(|c| c.number == number) {
            self.request_index(index, now);
            return;
        }
        if services.catalog.by_number(number).is_none() {
            debug!("no channel numbered {}", number);
            return;
        }
        // Not in the current list: switch to the unfiltered list
        let all = services
            .catalog
            .list_by_filter(&ChannelFilter::All, &*services.favorites);
        if let Some(index) = all.iter().position(|c| c.number == number) {
            self.channels = all;
            self.request_index(index, now);
        }
    }

    fn is_stalled(&self) -> bool {
        self.switcher.has_pipeline()
            && !self.switcher.is_paused()
            && matches!(
                self.switcher.status(),
                PipelineStatus::Idle | PipelineStatus::Stopped | PipelineStatus::Paused
            )
    }

    fn handle_event(&mut self, mut event: Option<SwitchEvent>, now: Instant) {
        while let Some(ev) = event.take() {
            if let SwitchEvent::Failed(reason) = &ev {
                self.last_failure = Some(reason.clone());
            }
            let action = self.health.on_event(&ev, now);
            event = self.apply(action);
        }
    }

    fn apply(&mut self, action: HealthAction) -> Option<SwitchEvent> {
        match action {
            HealthAction::None => None,
            HealthAction::SoftResume => {
                let event = self.switcher.soft_resume();
                if event.is_some() {
                    warn!("soft resume failed");
                }
                event
            }
            HealthAction::Rebuild => self.switcher.rebuild(),
            HealthAction::GiveUp => {
                let reason = self
                    .last_failure
                    .take()
                    .unwrap_or_else(|| "stream unavailable".to_string());
                self.switcher.fail(reason);
                None
            }
        }
    }
}
