//! End-to-end flow tests for zaptv
//!
//! Drives the whole app through classified key presses: home selector,
//! channel grid, live player and back out again, with fake pipelines
//! standing in for the external player.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use zaptv::app::{App, AppState, HomeItem, Services};
use zaptv::catalog::{MemoryCatalog, MemoryEpg, MemoryFavorites};
use zaptv::config::Config;
use zaptv::input::{classify, KeyPress, RemoteKey};
use zaptv::live::SwitchState;
use zaptv::models::{Channel, ChannelFilter};
use zaptv::nav::FocusRegion;
use zaptv::stream::{FormatHint, LoggingBoost, PipelineError, PipelineFactory, PipelineStatus, VideoPipeline};

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct Log {
    created: Vec<String>,
    disposed: usize,
}

struct StubPipeline {
    log: Rc<RefCell<Log>>,
}

impl VideoPipeline for StubPipeline {
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
        PipelineStatus::Playing
    }
    fn dispose(&mut self) {
        self.log.borrow_mut().disposed += 1;
    }
}

struct StubFactory {
    log: Rc<RefCell<Log>>,
}

impl PipelineFactory for StubFactory {
    fn create(
        &self,
        url: &str,
        _headers: &[(String, String)],
        _hint: FormatHint,
    ) -> Result<Box<dyn VideoPipeline>, PipelineError> {
        self.log.borrow_mut().created.push(url.to_string());
        Ok(Box::new(StubPipeline { log: self.log.clone() }))
    }
}

fn channel(n: u32, category: &str) -> Channel {
    Channel {
        id: format!("ch-{}", n),
        name: format!("Channel {}", n),
        number: n,
        category: category.to_string(),
        logo: None,
        url: format!("http://iptv.example/live/{}.m3u8", n),
        adult: false,
    }
}

fn app_with(favorites: &[&str]) -> (App, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let channels = (1..=12)
        .map(|n| channel(n, if n <= 6 { "News" } else { "Sports" }))
        .collect();
    let services = Services {
        catalog: Box::new(MemoryCatalog::new(channels, false)),
        favorites: Box::new(MemoryFavorites::with_ids(favorites.iter().map(|s| s.to_string()))),
        epg: Box::new(MemoryEpg::default()),
        pipelines: Rc::new(StubFactory { log: log.clone() }),
        boost: Rc::new(LoggingBoost::new()),
    };
    (App::new(services, &Config::default()), log)
}

/// Feeds keys 200ms apart, like a person pressing a remote
struct Remote {
    now: Instant,
}

impl Remote {
    fn new() -> Self {
        Self { now: Instant::now() }
    }

    fn press(&mut self, app: &mut App, key: RemoteKey) {
        self.now += Duration::from_millis(200);
        app.handle_key(KeyPress::new(key), self.now);
        app.tick(self.now);
    }

    fn wait(&mut self, app: &mut App, duration: Duration) {
        self.now += duration;
        app.tick(self.now);
    }
}

// =============================================================================
// Flows
// =============================================================================

#[test]
fn test_home_to_player_and_back() {
    let (mut app, log) = app_with(&[]);
    let mut remote = Remote::new();

    assert_eq!(app.state, AppState::Home);
    assert_eq!(app.home.selected_item(), HomeItem::LiveTv);

    remote.press(&mut app, RemoteKey::Select);
    assert_eq!(app.state, AppState::Channels);
    let browser = app.browser.as_ref().unwrap();
    assert_eq!(browser.channels().len(), 12);
    assert_eq!(browser.focus().region, FocusRegion::Grid);

    remote.press(&mut app, RemoteKey::Right);
    remote.press(&mut app, RemoteKey::Down);
    remote.press(&mut app, RemoteKey::Select);
    assert_eq!(app.state, AppState::Player);
    assert_eq!(log.borrow().created, vec!["http://iptv.example/live/7.m3u8"]);

    remote.wait(&mut app, Duration::from_millis(100));
    let player = app.player.as_ref().unwrap();
    assert_eq!(player.switch_state(), &SwitchState::Playing);

    remote.press(&mut app, RemoteKey::Back);
    assert_eq!(app.state, AppState::Channels);
    assert!(app.player.is_none());
    assert_eq!(log.borrow().disposed, 1);
    // The browser remembers where focus was
    assert_eq!(app.browser.as_ref().unwrap().focus().grid_index, Some(6));

    remote.press(&mut app, RemoteKey::Back);
    assert_eq!(app.state, AppState::Home);
    assert!(app.browser.is_none());

    remote.press(&mut app, RemoteKey::Back);
    assert!(app.running);
    assert!(app.notice.is_some());
    remote.press(&mut app, RemoteKey::Back);
    assert!(!app.running);
}

#[test]
fn test_exit_warning_expires() {
    let (mut app, _log) = app_with(&[]);
    let mut remote = Remote::new();

    remote.press(&mut app, RemoteKey::Back);
    assert!(app.home.is_exit_warning(remote.now));

    remote.wait(&mut app, Duration::from_secs(3));
    assert!(!app.home.is_exit_warning(remote.now));

    // The window has passed, so this warns again instead of exiting
    remote.press(&mut app, RemoteKey::Back);
    assert!(app.running);
}

#[test]
fn test_favorites_entry_and_zapping() {
    let (mut app, log) = app_with(&["ch-3", "ch-9"]);
    let mut remote = Remote::new();

    remote.press(&mut app, RemoteKey::Down);
    assert_eq!(app.home.selected_item(), HomeItem::Favorites);
    remote.press(&mut app, RemoteKey::Select);

    let browser = app.browser.as_ref().unwrap();
    assert_eq!(browser.current_filter(), &ChannelFilter::Favorites);
    assert_eq!(browser.channels().len(), 2);

    remote.press(&mut app, RemoteKey::Select);
    assert_eq!(app.state, AppState::Player);

    // Zapping stays inside the favorites list
    remote.press(&mut app, RemoteKey::ChannelUp);
    remote.wait(&mut app, Duration::from_millis(600));
    assert_eq!(
        log.borrow().created,
        vec!["http://iptv.example/live/3.m3u8", "http://iptv.example/live/9.m3u8"]
    );
}

#[test]
fn test_header_home_tab_leaves_browser() {
    let (mut app, _log) = app_with(&[]);
    let mut remote = Remote::new();

    remote.press(&mut app, RemoteKey::Select);
    remote.press(&mut app, RemoteKey::Up);
    assert_eq!(app.browser.as_ref().unwrap().focus().region, FocusRegion::Header);

    remote.press(&mut app, RemoteKey::Left);
    remote.press(&mut app, RemoteKey::Select);
    assert_eq!(app.state, AppState::Home);
}

#[test]
fn test_quit_tears_down_player() {
    let (mut app, log) = app_with(&[]);
    let mut remote = Remote::new();

    remote.press(&mut app, RemoteKey::Select);
    remote.press(&mut app, RemoteKey::Select);
    assert_eq!(app.state, AppState::Player);

    remote.press(&mut app, RemoteKey::Quit);
    assert!(!app.running);
    assert_eq!(log.borrow().disposed, 1);
}

#[test]
fn test_pointer_click_opens_player() {
    let (mut app, log) = app_with(&[]);
    let mut remote = Remote::new();

    remote.press(&mut app, RemoteKey::Select);
    app.pointer_moved();
    app.pointer_select(4, remote.now);

    assert_eq!(app.state, AppState::Player);
    assert_eq!(log.borrow().created, vec!["http://iptv.example/live/5.m3u8"]);
}

// =============================================================================
// Key classification
// =============================================================================

fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind,
        state: KeyEventState::NONE,
    }
}

#[test]
fn test_classified_keys_drive_the_app() {
    let (mut app, _log) = app_with(&[]);
    let now = Instant::now();

    let press = classify(&key(KeyCode::Enter, KeyEventKind::Press)).unwrap();
    app.handle_key(press, now);
    assert_eq!(app.state, AppState::Channels);

    assert!(classify(&key(KeyCode::Enter, KeyEventKind::Release)).is_none());

    let held = classify(&key(KeyCode::Esc, KeyEventKind::Repeat)).unwrap();
    assert!(held.repeat);
    assert_eq!(held.key, RemoteKey::Back);
}
