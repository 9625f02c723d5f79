//! Screen stack and remote-key dispatch
//!
//! Owns the screen stack (home selector, channel browser, live player),
//! routes classified key presses to the active screen and drives every
//! screen timer from `tick`. Collaborators are injected through
//! [`Services`]; nothing here touches the terminal or the network.

use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info};

use crate::catalog::{ChannelCatalog, EpgProvider, FavoritesStore};
use crate::config::{Config, Timings};
use crate::input::{KeyPress, RemoteKey};
use crate::live::{LivePlayer, PlayerOutcome, ResolveRequest};
use crate::models::{Channel, ChannelFilter};
use crate::nav::{BackDebouncer, BrowseOutcome, ChannelBrowser, ExitConfirm, ExitDecision, ListState};
use crate::stream::{PipelineFactory, VolumeBoost};

// =============================================================================
// App State Enum
// =============================================================================

/// Screen currently on display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Selector: Live TV, Favorites, Quit
    #[default]
    Home,
    /// Channel grid with category sidebar
    Channels,
    /// Full-screen live player
    Player,
}

// =============================================================================
// Services
// =============================================================================

/// Collaborators the screens work against
pub struct Services {
    pub catalog: Box<dyn ChannelCatalog>,
    pub favorites: Box<dyn FavoritesStore>,
    pub epg: Box<dyn EpgProvider>,
    pub pipelines: Rc<dyn PipelineFactory>,
    pub boost: Rc<dyn VolumeBoost>,
}

// =============================================================================
// Home Screen State
// =============================================================================

/// Entries of the home selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    LiveTv,
    Favorites,
    Quit,
}

impl HomeItem {
    pub const ALL: [HomeItem; 3] = [HomeItem::LiveTv, HomeItem::Favorites, HomeItem::Quit];

    pub fn label(&self) -> &'static str {
        match self {
            HomeItem::LiveTv => "Live TV",
            HomeItem::Favorites => "Favorites",
            HomeItem::Quit => "Quit",
        }
    }
}

/// Home view state
#[derive(Debug, Clone)]
pub struct HomeState {
    pub list: ListState,
    exit: ExitConfirm,
}

impl HomeState {
    fn new(timings: &Timings) -> Self {
        Self {
            list: ListState::new(HomeItem::ALL.len()),
            exit: ExitConfirm::new(timings.exit_confirm()),
        }
    }

    pub fn selected_item(&self) -> HomeItem {
        HomeItem::ALL
            .get(self.list.selected)
            .copied()
            .unwrap_or(HomeItem::LiveTv)
    }

    /// True while "press back again to exit" should show
    pub fn is_exit_warning(&self, now: Instant) -> bool {
        self.exit.is_warning(now)
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Screens to return to on Back
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Transient message for the status bar
    pub notice: Option<String>,

    pub home: HomeState,
    pub browser: Option<ChannelBrowser>,
    pub player: Option<LivePlayer>,

    pub services: Services,
    timings: Timings,
    columns: usize,
    headers: Vec<(String, String)>,
    back: BackDebouncer,
}

impl App {
    pub fn new(services: Services, config: &Config) -> Self {
        let timings = config.timings.clone();
        Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            notice: None,
            home: HomeState::new(&timings),
            browser: None,
            player: None,
            services,
            columns: config.grid_columns(),
            headers: vec![("User-Agent".to_string(), config.user_agent().to_string())],
            back: BackDebouncer::new(timings.back_coalesce()),
            timings,
        }
    }

    /// Open a screen, remembering the current one
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
    }

    /// Go back to previous state, unmounting the screen being left
    pub fn back(&mut self) -> bool {
        let Some(prev) = self.nav_stack.pop() else {
            return false;
        };
        match self.state {
            AppState::Player => {
                if let Some(mut player) = self.player.take() {
                    player.teardown();
                }
            }
            AppState::Channels => self.browser = None,
            AppState::Home => {}
        }
        self.state = prev;
        true
    }

    /// Quit the application, tearing the player down first
    pub fn quit(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.teardown();
        }
        self.running = false;
    }

    /// Open the channel browser on `filter`
    pub fn open_channels(&mut self, filter: ChannelFilter) {
        self.browser = Some(ChannelBrowser::new(
            &*self.services.catalog,
            &*self.services.favorites,
            self.columns,
            &self.timings,
            filter,
        ));
        self.navigate(AppState::Channels);
    }

    /// Mount the player on `channels[index]`
    pub fn open_player(&mut self, channels: Vec<Channel>, index: usize, now: Instant) {
        if let Some(mut old) = self.player.take() {
            old.teardown();
        }
        info!("opening player at index {} of {}", index, channels.len());
        self.player = Some(LivePlayer::new(
            channels,
            index,
            &self.services,
            &self.timings,
            self.headers.clone(),
            now,
        ));
        self.navigate(AppState::Player);
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Handle a classified key press
    pub fn handle_key(&mut self, press: KeyPress, now: Instant) {
        self.notice = None;

        if press.key == RemoteKey::Quit {
            self.quit();
            return;
        }

        match self.state {
            AppState::Home => self.handle_home_key(press, now),
            AppState::Channels => self.handle_channels_key(press, now),
            AppState::Player => self.handle_player_key(press, now),
        }
    }

    fn handle_home_key(&mut self, press: KeyPress, now: Instant) {
        match press.key {
            RemoteKey::Up => {
                self.home.list.up();
            }
            RemoteKey::Down => {
                self.home.list.down();
            }
            RemoteKey::Select => match self.home.selected_item() {
                HomeItem::LiveTv => self.open_channels(ChannelFilter::All),
                HomeItem::Favorites => self.open_channels(ChannelFilter::Favorites),
                HomeItem::Quit => self.quit(),
            },
            RemoteKey::Back => {
                if !self.back.accept(now) {
                    return;
                }
                match self.home.exit.press(now) {
                    ExitDecision::Warn => {
                        self.notice = Some("Press back again to exit".to_string());
                    }
                    ExitDecision::Exit => self.quit(),
                }
            }
            _ => {}
        }
    }

    fn handle_channels_key(&mut self, press: KeyPress, now: Instant) {
        let Some(browser) = self.browser.as_mut() else {
            return;
        };
        let outcome = browser.handle_key(
            press,
            now,
            &*self.services.catalog,
            &mut *self.services.favorites,
        );
        self.apply_browse(outcome, now);
    }

    fn handle_player_key(&mut self, press: KeyPress, now: Instant) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if player.handle_key(press, now, &mut self.services) == PlayerOutcome::Exit {
            self.back();
        }
    }

    fn apply_browse(&mut self, outcome: BrowseOutcome, now: Instant) {
        match outcome {
            BrowseOutcome::None => {}
            BrowseOutcome::Play { channels, index } => self.open_player(channels, index, now),
            BrowseOutcome::Leave => {
                self.back();
            }
            BrowseOutcome::Quit => self.quit(),
        }
    }

    /// Mouse movement over the browser
    pub fn pointer_moved(&mut self) {
        if let Some(browser) = self.browser.as_mut() {
            browser.pointer_moved();
        }
    }

    /// Mouse click on a grid cell
    pub fn pointer_select(&mut self, index: usize, now: Instant) {
        if self.state != AppState::Channels {
            return;
        }
        let Some(browser) = self.browser.as_mut() else {
            return;
        };
        let outcome = browser.pointer_select(index, now);
        self.apply_browse(outcome, now);
    }

    /// Grid viewport size reported by the renderer
    pub fn set_viewport(&mut self, viewport: f32, cell_height: f32, now: Instant) {
        if let Some(browser) = self.browser.as_mut() {
            browser.set_viewport(viewport, cell_height, now);
        }
    }

    // -------------------------------------------------------------------------
    // Timers and completions
    // -------------------------------------------------------------------------

    /// Advance every live timer
    pub fn tick(&mut self, now: Instant) {
        if let Some(player) = self.player.as_mut() {
            player.tick(now, &self.services);
        }
        if let Some(browser) = self.browser.as_mut() {
            browser.tick(now, &*self.services.catalog, &*self.services.favorites);
        }
    }

    /// Resolve requests for the runtime to run
    pub fn take_resolve_requests(&mut self) -> Vec<ResolveRequest> {
        self.player
            .as_mut()
            .map(LivePlayer::take_resolve_requests)
            .unwrap_or_default()
    }

    /// Completion of a resolve request
    pub fn on_url_resolved(&mut self, generation: u64, url: String, now: Instant) {
        match self.player.as_mut() {
            Some(player) => player.on_url_resolved(generation, url, now),
            None => debug!("resolve completion with no player (generation {})", generation),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
