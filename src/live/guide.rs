//! Mini-guide overlay
//!
//! Shows the schedule of a highlighted channel without tuning to it.
//! Left/Right move the highlighted channel, Up/Down the highlighted program.
//! Any interaction pushes the idle deadline; when it passes, a changed
//! channel is committed and the overlay hides.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::catalog::EpgProvider;
use crate::models::{Channel, Program};
use crate::nav::{Direction, ListState};
use crate::timer::Timer;

/// Programs fetched per channel
pub const GUIDE_PROGRAMS: usize = 8;

/// Program rows visible at once
pub const GUIDE_VISIBLE_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOutcome {
    None,
    /// Tune to the channel at this index
    Commit(usize),
    /// Hidden without changing channel
    Dismissed,
}

#[derive(Debug, Clone)]
pub struct MiniGuide {
    visible: bool,
    channel_index: usize,
    programs: Vec<Program>,
    program_list: ListState,
    idle: Timer,
}

impl MiniGuide {
    pub fn new(idle: Duration) -> Self {
        Self {
            visible: false,
            channel_index: 0,
            programs: Vec::new(),
            program_list: ListState::new(0),
            idle: Timer::new(idle),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn channel_index(&self) -> usize {
        self.channel_index
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn program_list(&self) -> &ListState {
        &self.program_list
    }

    pub fn open(
        &mut self,
        channel_index: usize,
        channels: &[Channel],
        epg: &mut dyn EpgProvider,
        at: DateTime<Utc>,
        now: Instant,
    ) {
        self.visible = true;
        self.channel_index = channel_index.min(channels.len().saturating_sub(1));
        self.load_programs(channels, epg, at);
        self.idle.start(now);
    }

    /// Move the highlighted channel, wrapping at both ends
    pub fn move_channel(
        &mut self,
        direction: Direction,
        channels: &[Channel],
        epg: &mut dyn EpgProvider,
        at: DateTime<Utc>,
        now: Instant,
    ) {
        if !self.visible {
            return;
        }
        self.idle.start(now);
        let len = channels.len();
        if len == 0 {
            return;
        }
        self.channel_index = match direction {
            Direction::Left => (self.channel_index + len - 1) % len,
            Direction::Right => (self.channel_index + 1) % len,
            Direction::Up | Direction::Down => return,
        };
        self.load_programs(channels, epg, at);
    }

    /// Move the highlighted program; a no-op on an empty schedule
    pub fn move_program(&mut self, direction: Direction, now: Instant) {
        if !self.visible {
            return;
        }
        self.idle.start(now);
        match direction {
            Direction::Up => {
                self.program_list.up();
            }
            Direction::Down => {
                self.program_list.down();
            }
            Direction::Left | Direction::Right => return,
        }
        self.program_list.scroll_into_view(GUIDE_VISIBLE_ROWS);
    }

    /// Explicit confirm: commit the highlighted channel and hide
    pub fn confirm(&mut self) -> GuideOutcome {
        if !self.visible {
            return GuideOutcome::None;
        }
        self.hide();
        GuideOutcome::Commit(self.channel_index)
    }

    /// Hide without committing
    pub fn hide(&mut self) {
        self.visible = false;
        self.idle.cancel();
    }

    /// Idle expiry: commit if the highlight moved off `active_index`
    pub fn tick(&mut self, now: Instant, active_index: usize) -> GuideOutcome {
        if !self.visible || !self.idle.fire(now) {
            return GuideOutcome::None;
        }
        self.hide();
        if self.channel_index != active_index {
            debug!("guide idle, committing index {}", self.channel_index);
            GuideOutcome::Commit(self.channel_index)
        } else {
            GuideOutcome::Dismissed
        }
    }

    fn load_programs(&mut self, channels: &[Channel], epg: &mut dyn EpgProvider, at: DateTime<Utc>) {
        let Some(channel) = channels.get(self.channel_index) else {
            self.programs.clear();
            self.program_list = ListState::new(0);
            return;
        };
        if !epg.is_loaded(&channel.id) {
            epg.load_channel_epg(&channel.id);
        }
        self.programs = epg.upcoming_programs(&channel.id, at, GUIDE_PROGRAMS);
        self.program_list = ListState::new(self.programs.len());
    }
}
