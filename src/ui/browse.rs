//! Channel browser rendering
//!
//! Header tabs on top, category sidebar on the left, channel grid filling
//! the rest. Grid rows are `CELL_HEIGHT` lines tall and scrolled by the
//! browser's animated offset.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::catalog::FavoritesStore;
use crate::models::Channel;
use crate::nav::{ChannelBrowser, FocusRegion, HEADER_TABS};
use crate::ui::{Theme, CELL_HEIGHT};

const SIDEBAR_WIDTH: u16 = 24;

/// Regions of the browser screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseAreas {
    pub header: Rect,
    pub sidebar: Rect,
    pub grid: Rect,
}

pub fn areas(body: Rect) -> BrowseAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(body);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(rows[1]);
    BrowseAreas {
        header: rows[0],
        sidebar: cols[0],
        grid: cols[1],
    }
}

/// The grid area without its border; its height is the scroll viewport
pub fn grid_inner(grid: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(grid)
}

/// First grid row drawn: follows the scroll offset, pulled back so the
/// focused row is always on screen
pub fn first_row(browser: &ChannelBrowser, inner: Rect, now: Instant) -> usize {
    let visible = (inner.height / CELL_HEIGHT).max(1) as usize;
    let mut first = (browser.scroll_offset(now).max(0.0) / CELL_HEIGHT as f32).ceil() as usize;
    if let Some(index) = browser.focus().grid_index {
        let row = index / browser.columns().max(1);
        if row < first {
            first = row;
        } else if row >= first + visible {
            first = row + 1 - visible;
        }
    }
    first
}

/// Grid index under a terminal position, if the position is inside the grid
pub fn cell_at(inner: Rect, columns: usize, first_row: usize, x: u16, y: u16) -> Option<usize> {
    if columns == 0 || inner.width == 0 {
        return None;
    }
    if x < inner.x || x >= inner.right() || y < inner.y || y >= inner.bottom() {
        return None;
    }
    let row = first_row + ((y - inner.y) / CELL_HEIGHT) as usize;
    let cell_width = (inner.width / columns as u16).max(1);
    let col = ((x - inner.x) / cell_width) as usize;
    if col >= columns {
        return None;
    }
    Some(row * columns + col)
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    browser: &ChannelBrowser,
    favorites: &dyn FavoritesStore,
    now: Instant,
) {
    let areas = areas(area);
    render_header(frame, areas.header, browser);
    render_sidebar(frame, areas.sidebar, browser);
    render_grid(frame, areas.grid, browser, favorites, now);
}

fn region_border(browser: &ChannelBrowser, region: FocusRegion) -> Style {
    if browser.focus().region == region {
        Theme::border_focused()
    } else {
        Theme::border()
    }
}

fn render_header(frame: &mut Frame, area: Rect, browser: &ChannelBrowser) {
    let focused = browser.focus().region == FocusRegion::Header;
    let mut spans = Vec::with_capacity(HEADER_TABS.len() * 2);
    for (i, tab) in HEADER_TABS.iter().enumerate() {
        let style = if i == browser.header().selected {
            if focused {
                Theme::focused()
            } else {
                Theme::selected()
            }
        } else {
            Theme::dimmed()
        };
        spans.push(Span::styled(format!(" {} ", tab), style));
        spans.push(Span::raw("  "));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(region_border(browser, FocusRegion::Header))
            .title(Span::styled(" zaptv ", Theme::title())),
    );
    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, browser: &ChannelBrowser) {
    let focused = browser.focus().region == FocusRegion::Sidebar;
    let selected = browser.sidebar().selected;
    let visible = area.height.saturating_sub(2) as usize;
    let skip = selected.saturating_sub(visible.saturating_sub(1));

    let items: Vec<ListItem> = browser
        .filters()
        .iter()
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(i, filter)| {
            let style = match (i == selected, focused) {
                (true, true) => Theme::focused(),
                (true, false) => Theme::selected(),
                _ => Theme::text(),
            };
            ListItem::new(Line::from(Span::styled(format!(" {} ", filter.label()), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(region_border(browser, FocusRegion::Sidebar))
            .title(" Categories "),
    );
    frame.render_widget(list, area);
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    browser: &ChannelBrowser,
    favorites: &dyn FavoritesStore,
    now: Instant,
) {
    let title = format!(
        " {} ({}) ",
        browser.current_filter().label(),
        browser.channels().len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(region_border(browser, FocusRegion::Grid))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if browser.channels().is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No channels in this category",
            Theme::dimmed(),
        )));
        frame.render_widget(empty, inner);
        return;
    }

    let columns = browser.columns();
    let cell_width = inner.width / columns as u16;
    if cell_width == 0 {
        return;
    }

    let focus = browser.focus();
    let top = first_row(browser, inner, now);
    let visible_rows = (inner.height / CELL_HEIGHT) as usize;

    for (slot, row) in (top..top + visible_rows).enumerate() {
        for col in 0..columns {
            let index = row * columns + col;
            let Some(channel) = browser.channels().get(index) else {
                return;
            };
            let cell = Rect {
                x: inner.x + col as u16 * cell_width,
                y: inner.y + slot as u16 * CELL_HEIGHT,
                width: cell_width,
                height: CELL_HEIGHT,
            };
            let focused = focus.region == FocusRegion::Grid && focus.grid_index == Some(index);
            render_cell(frame, cell, channel, favorites.is_favorite(&channel.id), focused, focus.dpad_mode);
        }
    }
}

fn render_cell(
    frame: &mut Frame,
    area: Rect,
    channel: &Channel,
    favorite: bool,
    focused: bool,
    dpad_mode: bool,
) {
    // Pointer hover is left to the terminal; only D-pad focus gets the ring
    let (border, text) = match (focused, dpad_mode) {
        (true, true) => (Theme::border_focused(), Theme::focused()),
        (true, false) => (Theme::border(), Theme::selected()),
        _ => (Theme::border(), Theme::text()),
    };

    let mut spans = vec![
        Span::styled(format!("{:>3} ", channel.number), Theme::channel_number()),
        Span::styled(channel.name.clone(), text),
    ];
    if favorite {
        spans.push(Span::styled(" ★", Theme::warning()));
    }

    let cell = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border),
    );
    frame.render_widget(cell, area);
}
