//! Terminal UI
//!
//! Pure rendering of the app state with ratatui. Nothing here mutates the
//! controllers; the event loop feeds geometry back through `App::set_viewport`.

pub mod browse;
pub mod home;
pub mod player;
pub mod theme;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
pub use theme::Theme;

/// Height of one channel grid row, in terminal lines
pub const CELL_HEIGHT: u16 = 3;

/// Top-level screen split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub body: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    ScreenLayout {
        body: chunks[0],
        status: chunks[1],
    }
}

/// Render the whole frame
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    let screen = layout(area);
    match app.state {
        AppState::Home => home::render(frame, screen.body, app),
        AppState::Channels => {
            if let Some(browser) = app.browser.as_ref() {
                browse::render(frame, screen.body, browser, &*app.services.favorites, now);
            }
        }
        AppState::Player => {
            if let Some(player) = app.player.as_ref() {
                player::render(frame, screen.body, player, &*app.services.epg);
            }
        }
    }
    render_status_bar(frame, screen.status, app, now);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let screen = match app.state {
        AppState::Home => " HOME ",
        AppState::Channels => " CHANNELS ",
        AppState::Player => " LIVE ",
    };

    let hints = match app.state {
        AppState::Home => " ↑↓ move  ↵ open  esc esc: exit  q: quit ",
        AppState::Channels => " ←↑↓→ move  ↵ watch  f: favorite  esc: back ",
        AppState::Player => " ↑↓ zap  0-9 number  ↵ guide  +/- volume  m mute  esc: back ",
    };

    let mut spans = vec![Span::styled(screen, Theme::keybind()), Span::raw(" ")];
    if let Some(notice) = app.notice.as_deref() {
        if app.state != AppState::Home || app.home.is_exit_warning(now) {
            spans.push(Span::styled(notice, Theme::warning()));
            spans.push(Span::raw(" │ "));
        }
    }
    spans.push(Span::styled(hints, Theme::dimmed()));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_bar()), area);
}
