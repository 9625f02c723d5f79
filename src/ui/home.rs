//! Home selector

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::{App, HomeItem};
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let height = HomeItem::ALL.len() as u16 * 2 + 5;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(32),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("ZAP", Theme::title()),
            Span::styled("TV", Theme::live_badge()),
        ]),
        Line::from(""),
    ];
    for (i, item) in HomeItem::ALL.iter().enumerate() {
        let style = if i == app.home.list.selected {
            Theme::focused()
        } else {
            Theme::text()
        };
        lines.push(Line::from(Span::styled(format!("  {:^20}  ", item.label()), style)));
        lines.push(Line::from(""));
    }

    let menu = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused()),
    );
    frame.render_widget(menu, horizontal[1]);
}
