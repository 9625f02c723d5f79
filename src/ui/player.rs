//! Live player rendering
//!
//! Video plays in the external player window; the terminal shows the
//! channel banner, volume, numeric entry and the mini-guide overlay.

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::catalog::EpgProvider;
use crate::live::{LivePlayer, GUIDE_VISIBLE_ROWS};
use crate::models::{PlaybackSession, SessionStatus};
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, player: &LivePlayer, epg: &dyn EpgProvider) {
    let session = player.session();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    render_banner(frame, chunks[0], player, &session, epg);
    render_status(frame, chunks[1], &session);
    render_volume(frame, chunks[2], &session);

    if !player.numeric_buffer().is_empty() {
        render_numeric(frame, area, player.numeric_buffer());
    }
    if player.guide().is_visible() {
        render_guide(frame, area, player);
    }
}

fn render_banner(
    frame: &mut Frame,
    area: Rect,
    player: &LivePlayer,
    session: &PlaybackSession,
    epg: &dyn EpgProvider,
) {
    // The highlighted channel, which may still be waiting out the debounce
    let channel = player
        .channels()
        .get(player.selected_index())
        .or(session.channel.as_ref());

    let mut lines = Vec::new();
    match channel {
        Some(channel) => {
            lines.push(Line::from(vec![
                Span::styled(" LIVE ", Theme::live_badge()),
                Span::raw(" "),
                Span::styled(format!("{} ", channel.number), Theme::channel_number()),
                Span::styled(channel.name.clone(), Theme::title()),
            ]));
            match epg.current_program(&channel.id, Utc::now()) {
                Some(program) => lines.push(Line::from(Span::styled(program.to_string(), Theme::text()))),
                None => lines.push(Line::from(Span::styled("No guide data", Theme::dimmed()))),
            }
        }
        None => lines.push(Line::from(Span::styled("No channel", Theme::dimmed()))),
    }

    let banner = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(banner, area);
}

fn render_status(frame: &mut Frame, area: Rect, session: &PlaybackSession) {
    let (style, hint) = match &session.status {
        SessionStatus::Error(_) => (Theme::error(), "Enter: retry   Esc: back to channels"),
        SessionStatus::Playing => (Theme::success(), ""),
        SessionStatus::Paused => (Theme::warning(), "Space: resume"),
        _ => (Theme::loading(), ""),
    };

    let mut lines = vec![Line::from(Span::styled(session.status.to_string(), style))];
    if session.retry_count > 0 && !session.status.is_error() {
        lines.push(Line::from(Span::styled(
            format!("Reconnecting (attempt {})", session.retry_count),
            Theme::warning(),
        )));
    }
    if !hint.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint, Theme::dimmed())));
    }

    let status = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn render_volume(frame: &mut Frame, area: Rect, session: &PlaybackSession) {
    let label = if session.muted {
        "Muted".to_string()
    } else if session.is_boosted() {
        format!("{}% BOOST", session.volume_percent())
    } else {
        format!("{}%", session.volume_percent())
    };
    let ratio = if session.muted {
        0.0
    } else {
        (session.volume as f64 / 2.0).clamp(0.0, 1.0)
    };
    let style = if session.is_boosted() {
        Theme::warning()
    } else {
        Theme::progress_bar()
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border())
                .title(" Volume "),
        )
        .gauge_style(style)
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_numeric(frame: &mut Frame, area: Rect, buffer: &str) {
    let width = 9;
    let popup = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.y + 1,
        width: width.min(area.width),
        height: 3.min(area.height),
    };
    let entry = format!("{:_<3}", buffer);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(Span::styled(entry, Theme::focused()))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Theme::border_focused()),
            ),
        popup,
    );
}

fn render_guide(frame: &mut Frame, area: Rect, player: &LivePlayer) {
    let guide = player.guide();
    let height = (GUIDE_VISIBLE_ROWS as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(height),
        width: area.width,
        height,
    };

    let title = match player.channels().get(guide.channel_index()) {
        Some(channel) => format!(" ◀ {} {} ▶ ", channel.number, channel.name),
        None => " Guide ".to_string(),
    };

    let now = Utc::now();
    let list = guide.program_list();
    let mut lines = Vec::new();
    if guide.programs().is_empty() {
        lines.push(Line::from(Span::styled("No programs scheduled", Theme::dimmed())));
    }
    for (i, program) in guide
        .programs()
        .iter()
        .enumerate()
        .skip(list.offset)
        .take(GUIDE_VISIBLE_ROWS)
    {
        let style = if i == list.selected {
            Theme::focused()
        } else {
            Theme::text()
        };
        let mut spans = vec![Span::styled(program.to_string(), style)];
        if program.is_live_at(now) {
            spans.push(Span::styled(
                format!("  {}%", (program.progress(now) * 100.0).round()),
                Theme::dimmed(),
            ));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).style(Theme::overlay()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border_focused())
                .title(Span::styled(title, Theme::title())),
        ),
        popup,
    );
}
