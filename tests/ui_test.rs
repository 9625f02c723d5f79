//! UI rendering tests
//!
//! Renders each screen into a `TestBackend` and checks what lands in the
//! buffer, plus theme contrast and layout geometry.

use std::rc::Rc;
use std::time::{Duration, Instant};

use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use zaptv::app::{App, Services};
use zaptv::catalog::{MemoryCatalog, MemoryEpg, MemoryFavorites};
use zaptv::config::Config;
use zaptv::input::{KeyPress, RemoteKey};
use zaptv::models::Channel;
use zaptv::stream::{FormatHint, LoggingBoost, PipelineError, PipelineFactory, PipelineStatus, VideoPipeline};
use zaptv::ui::theme::{color_to_rgb, contrast_ratio, Theme};
use zaptv::ui::{self, CELL_HEIGHT};

// =============================================================================
// Fixtures
// =============================================================================

struct IdlePipeline;

impl VideoPipeline for IdlePipeline {
    fn play(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
    fn pause(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
    fn seek(&mut self, _position: Duration) -> Result<(), PipelineError> {
        Ok(())
    }
    fn set_volume(&mut self, _volume: f32) {}
    fn status(&mut self) -> PipelineStatus {
        PipelineStatus::Buffering
    }
    fn dispose(&mut self) {}
}

struct IdleFactory;

impl PipelineFactory for IdleFactory {
    fn create(
        &self,
        _url: &str,
        _headers: &[(String, String)],
        _hint: FormatHint,
    ) -> Result<Box<dyn VideoPipeline>, PipelineError> {
        Ok(Box::new(IdlePipeline))
    }
}

fn app() -> App {
    let channels = (1..=30)
        .map(|n| Channel {
            id: format!("ch-{}", n),
            name: format!("Chan {}", n),
            number: n,
            category: if n % 3 == 0 { "Movies".into() } else { "News".into() },
            logo: None,
            url: format!("http://iptv.example/live/{}.m3u8", n),
            adult: false,
        })
        .collect();
    let services = Services {
        catalog: Box::new(MemoryCatalog::new(channels, false)),
        favorites: Box::new(MemoryFavorites::with_ids(["ch-1".to_string()])),
        epg: Box::new(MemoryEpg::default()),
        pipelines: Rc::new(IdleFactory),
        boost: Rc::new(LoggingBoost::new()),
    };
    App::new(services, &Config::default())
}

/// Helper to create a test terminal with given size
fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &App, now: Instant) -> String {
    terminal.draw(|frame| ui::render(frame, app, now)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn press(app: &mut App, key: RemoteKey, now: Instant) {
    app.handle_key(KeyPress::new(key), now);
}

// =============================================================================
// Theme
// =============================================================================

#[test]
fn test_theme_text_contrast() {
    let bg = color_to_rgb(Theme::BACKGROUND).unwrap();
    for color in [Theme::TEXT, Theme::PRIMARY, Theme::FOCUS, Theme::WARNING] {
        let fg = color_to_rgb(color).unwrap();
        assert!(contrast_ratio(fg, bg) >= 4.5, "{:?} too dim on background", color);
    }
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_layout_reserves_status_bar() {
    let screen = ui::layout(Rect::new(0, 0, 80, 24));
    assert_eq!(screen.status.height, 1);
    assert_eq!(screen.body.height, 23);
}

#[test]
fn test_browse_grid_area() {
    let screen = ui::layout(Rect::new(0, 0, 100, 30));
    let areas = ui::browse::areas(screen.body);
    assert_eq!(areas.header.height, 3);
    assert_eq!(areas.sidebar.width, 24);
    assert_eq!(areas.grid.width, 76);

    let inner = ui::browse::grid_inner(areas.grid);
    assert_eq!(inner.height, 24);
    assert_eq!(inner.height / CELL_HEIGHT, 8);
}

// =============================================================================
// Screens
// =============================================================================

#[test]
fn test_home_screen_renders_menu() {
    let app = app();
    let mut terminal = test_terminal(80, 24);
    let text = draw(&mut terminal, &app, Instant::now());

    assert!(text.contains("Live TV"));
    assert!(text.contains("Favorites"));
    assert!(text.contains("Quit"));
    assert!(text.contains("HOME"));
}

#[test]
fn test_home_exit_warning_in_status_bar() {
    let mut app = app();
    let now = Instant::now();
    press(&mut app, RemoteKey::Back, now);

    let mut terminal = test_terminal(100, 24);
    assert!(draw(&mut terminal, &app, now).contains("Press back again to exit"));
    assert!(!draw(&mut terminal, &app, now + Duration::from_secs(3)).contains("Press back again"));
}

#[test]
fn test_browse_screen_renders_grid() {
    let mut app = app();
    let now = Instant::now();
    press(&mut app, RemoteKey::Select, now);

    // Four grid rows fit
    let mut terminal = test_terminal(120, 20);
    let text = draw(&mut terminal, &app, now);

    assert!(text.contains("All Channels (30)"));
    assert!(text.contains("Categories"));
    assert!(text.contains("Movies"));
    assert!(text.contains("Chan 1"));
    assert!(text.contains("★"));
    // Rows past the viewport are not drawn
    assert!(!text.contains("Chan 30"));
}

#[test]
fn test_browse_screen_follows_scroll() {
    let mut app = app();
    let now = Instant::now();
    press(&mut app, RemoteKey::Select, now);
    let grid = ui::browse::grid_inner(ui::browse::areas(ui::layout(Rect::new(0, 0, 120, 20)).body).grid);
    app.set_viewport(grid.height as f32, CELL_HEIGHT as f32, now);

    for _ in 0..5 {
        press(&mut app, RemoteKey::Down, now);
    }

    let mut terminal = test_terminal(120, 20);
    let text = draw(&mut terminal, &app, now + Duration::from_secs(1));
    assert!(text.contains("Chan 30"));
    assert!(!text.contains("Chan 1 "));
}

#[test]
fn test_player_screen_renders_overlays() {
    let mut app = app();
    let now = Instant::now();
    press(&mut app, RemoteKey::Select, now);
    press(&mut app, RemoteKey::Select, now);

    let mut terminal = test_terminal(100, 30);
    let text = draw(&mut terminal, &app, now);
    assert!(text.contains("LIVE"));
    assert!(text.contains("Chan 1"));
    assert!(text.contains("Buffering"));
    assert!(text.contains("100%"));

    for _ in 0..3 {
        press(&mut app, RemoteKey::VolumeUp, now);
    }
    press(&mut app, RemoteKey::Digit(4), now);
    let text = draw(&mut terminal, &app, now);
    assert!(text.contains("130% BOOST"));
    assert!(text.contains("4__"));

    press(&mut app, RemoteKey::Guide, now);
    let text = draw(&mut terminal, &app, now);
    assert!(text.contains("No programs scheduled"));
}
