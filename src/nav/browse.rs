//! Channel browser screen controller
//!
//! Header tabs across the top, category sidebar on the left, channel grid
//! in the middle. Exactly one region owns focus; the grid index is always
//! valid for the current filtered list or absent when the list is empty.

use std::time::Instant;
use tracing::debug;

use super::back::BackDebouncer;
use super::grid::{FocusGrid, FocusRegion, FocusTarget};
use super::list::ListState;
use super::scroll::{compute_offset, ScrollAnimator};
use crate::catalog::{ChannelCatalog, FavoritesStore};
use crate::config::Timings;
use crate::input::{KeyPress, RemoteKey};
use crate::models::{Channel, ChannelFilter};

/// Tabs in the header row
pub const HEADER_TABS: &[&str] = &["Home", "All Channels", "Favorites"];

const TAB_HOME: usize = 0;
const TAB_ALL: usize = 1;
const TAB_FAVORITES: usize = 2;

/// What the app should do after a browser key press
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseOutcome {
    None,
    /// Open the player on `channels[index]`
    Play { channels: Vec<Channel>, index: usize },
    /// Back to the previous screen
    Leave,
    Quit,
}

/// Focus bookkeeping for the browser
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFocus {
    pub region: FocusRegion,
    pub grid_index: Option<usize>,
    pub columns: usize,
    /// Set by any directional key, cleared by pointer input. The browser
    /// opens in D-pad mode since a remote key opens it.
    pub dpad_mode: bool,
}

/// Channel grid screen state
#[derive(Debug, Clone)]
pub struct ChannelBrowser {
    grid: FocusGrid,
    focus: NavigationFocus,
    filters: Vec<ChannelFilter>,
    sidebar: ListState,
    header: ListState,
    channels: Vec<Channel>,
    scroll: ScrollAnimator,
    viewport: f32,
    cell_height: f32,
    back: BackDebouncer,
    catalog_revision: u64,
    favorites_revision: u64,
}

impl ChannelBrowser {
    pub fn new(
        catalog: &dyn ChannelCatalog,
        favorites: &dyn FavoritesStore,
        columns: usize,
        timings: &Timings,
        filter: ChannelFilter,
    ) -> Self {
        let grid = FocusGrid::new(columns);
        let mut browser = Self {
            grid,
            focus: NavigationFocus {
                region: FocusRegion::Grid,
                grid_index: None,
                columns: grid.columns(),
                dpad_mode: true,
            },
            filters: Vec::new(),
            sidebar: ListState::new(0),
            header: ListState::new(HEADER_TABS.len()),
            channels: Vec::new(),
            scroll: ScrollAnimator::new(timings.scroll_transition()),
            viewport: 0.0,
            cell_height: 1.0,
            back: BackDebouncer::new(timings.back_coalesce()),
            catalog_revision: catalog.revision(),
            favorites_revision: favorites.revision(),
        };
        browser.rebuild_filters(catalog);
        let selected = browser
            .filters
            .iter()
            .position(|f| *f == filter)
            .unwrap_or(0);
        browser.sidebar.select(selected);
        browser.header.select(TAB_ALL);
        browser.load(catalog, favorites);
        browser.focus.grid_index = (!browser.channels.is_empty()).then_some(0);
        browser.focus.region = if browser.channels.is_empty() {
            FocusRegion::Sidebar
        } else {
            FocusRegion::Grid
        };
        browser
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn focus(&self) -> &NavigationFocus {
        &self.focus
    }

    pub fn filters(&self) -> &[ChannelFilter] {
        &self.filters
    }

    pub fn sidebar(&self) -> &ListState {
        &self.sidebar
    }

    pub fn header(&self) -> &ListState {
        &self.header
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    pub fn current_filter(&self) -> &ChannelFilter {
        self.filters
            .get(self.sidebar.selected)
            .unwrap_or(&ChannelFilter::All)
    }

    pub fn focused_channel(&self) -> Option<&Channel> {
        self.focus.grid_index.and_then(|i| self.channels.get(i))
    }

    /// Grid scroll offset, in the units given to `set_viewport`
    pub fn scroll_offset(&self, now: Instant) -> f32 {
        self.scroll.offset_at(now)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Route a key press to the focused region
    pub fn handle_key(
        &mut self,
        press: KeyPress,
        now: Instant,
        catalog: &dyn ChannelCatalog,
        favorites: &mut dyn FavoritesStore,
    ) -> BrowseOutcome {
        if let Some(direction) = press.key.direction() {
            // The key moves with the mode that was in effect when it was
            // pressed; it only switches D-pad mode on for the next one
            let was_dpad = std::mem::replace(&mut self.focus.dpad_mode, true);
            match self.focus.region {
                FocusRegion::Grid => {
                    let target = self.grid.move_focus(
                        self.focus.grid_index.unwrap_or(0),
                        direction,
                        self.channels.len(),
                        was_dpad,
                        self.sidebar.selected,
                    );
                    self.apply_target(target, now);
                }
                FocusRegion::Sidebar => self.sidebar_key(press.key, now, catalog, &*favorites),
                FocusRegion::Header => self.header_key(press.key),
                FocusRegion::Overlay => {}
            }
            return BrowseOutcome::None;
        }

        match press.key {
            RemoteKey::Back => {
                if self.back.accept(now) {
                    BrowseOutcome::Leave
                } else {
                    BrowseOutcome::None
                }
            }
            RemoteKey::Quit => BrowseOutcome::Quit,
            RemoteKey::Select => self.select(now, catalog, &*favorites),
            RemoteKey::Favorite => {
                self.toggle_favorite(now, catalog, favorites);
                BrowseOutcome::None
            }
            _ => BrowseOutcome::None,
        }
    }

    /// Pointer activity switches the screen out of D-pad mode
    pub fn pointer_moved(&mut self) {
        self.focus.dpad_mode = false;
    }

    /// Pointer/touch activation of a grid cell
    pub fn pointer_select(&mut self, index: usize, now: Instant) -> BrowseOutcome {
        self.pointer_moved();
        match self.grid.activate(index, self.channels.len()) {
            FocusTarget::Activate(i) => {
                self.focus.region = FocusRegion::Grid;
                self.set_grid_index(i, now);
                BrowseOutcome::Play {
                    channels: self.channels.clone(),
                    index: i,
                }
            }
            _ => BrowseOutcome::None,
        }
    }

    fn apply_target(&mut self, target: FocusTarget, now: Instant) {
        match target {
            FocusTarget::Grid(i) => self.set_grid_index(i, now),
            FocusTarget::Header(tab) => {
                self.focus.region = FocusRegion::Header;
                self.header.select(tab);
            }
            FocusTarget::Sidebar(i) => {
                self.focus.region = FocusRegion::Sidebar;
                self.sidebar.select(i);
            }
            FocusTarget::Activate(_) | FocusTarget::Stay => {}
        }
    }

    fn sidebar_key(
        &mut self,
        key: RemoteKey,
        now: Instant,
        catalog: &dyn ChannelCatalog,
        favorites: &dyn FavoritesStore,
    ) {
        match key {
            RemoteKey::Up => {
                if self.sidebar.up() {
                    self.apply_filter(now, catalog, favorites);
                } else {
                    self.focus.region = FocusRegion::Header;
                }
            }
            RemoteKey::Down => {
                if self.sidebar.down() {
                    self.apply_filter(now, catalog, favorites);
                }
            }
            RemoteKey::Right => self.enter_grid(now),
            _ => {}
        }
    }

    fn header_key(&mut self, key: RemoteKey) {
        match key {
            RemoteKey::Left => {
                self.header.up();
            }
            RemoteKey::Right => {
                self.header.down();
            }
            RemoteKey::Down => {
                self.focus.region = if self.channels.is_empty() {
                    FocusRegion::Sidebar
                } else {
                    FocusRegion::Grid
                };
            }
            _ => {}
        }
    }

    fn select(
        &mut self,
        now: Instant,
        catalog: &dyn ChannelCatalog,
        favorites: &dyn FavoritesStore,
    ) -> BrowseOutcome {
        match self.focus.region {
            FocusRegion::Grid => {
                let Some(index) = self.focus.grid_index else {
                    return BrowseOutcome::None;
                };
                match self.grid.activate(index, self.channels.len()) {
                    FocusTarget::Activate(i) => BrowseOutcome::Play {
                        channels: self.channels.clone(),
                        index: i,
                    },
                    _ => BrowseOutcome::None,
                }
            }
            FocusRegion::Sidebar => {
                self.enter_grid(now);
                BrowseOutcome::None
            }
            FocusRegion::Header => match self.header.selected {
                TAB_HOME => BrowseOutcome::Leave,
                TAB_ALL | TAB_FAVORITES => {
                    let wanted = if self.header.selected == TAB_ALL {
                        ChannelFilter::All
                    } else {
                        ChannelFilter::Favorites
                    };
                    if let Some(i) = self.filters.iter().position(|f| *f == wanted) {
                        self.sidebar.select(i);
                        self.apply_filter(now, catalog, favorites);
                    }
                    self.enter_grid(now);
                    BrowseOutcome::None
                }
                _ => BrowseOutcome::None,
            },
            FocusRegion::Overlay => BrowseOutcome::None,
        }
    }

    fn enter_grid(&mut self, now: Instant) {
        if self.channels.is_empty() {
            return;
        }
        self.focus.region = FocusRegion::Grid;
        let index = self.focus.grid_index.unwrap_or(0);
        self.set_grid_index(index, now);
    }

    fn toggle_favorite(
        &mut self,
        now: Instant,
        catalog: &dyn ChannelCatalog,
        favorites: &mut dyn FavoritesStore,
    ) {
        if self.focus.region != FocusRegion::Grid {
            return;
        }
        let Some(channel) = self.focused_channel() else {
            return;
        };
        let id = channel.id.clone();
        let now_favorite = favorites.toggle(&id);
        debug!("favorite {} -> {}", id, now_favorite);
        self.refresh(now, catalog, &*favorites);
    }

    // -------------------------------------------------------------------------
    // List maintenance
    // -------------------------------------------------------------------------

    /// Pick up catalog / favorites mutations made elsewhere
    pub fn tick(&mut self, now: Instant, catalog: &dyn ChannelCatalog, favorites: &dyn FavoritesStore) {
        if catalog.revision() != self.catalog_revision {
            let current = self.current_filter().clone();
            self.rebuild_filters(catalog);
            let index = self.filters.iter().position(|f| *f == current).unwrap_or(0);
            self.sidebar.select(index);
            self.refresh(now, catalog, favorites);
        } else if favorites.revision() != self.favorites_revision {
            self.refresh(now, catalog, favorites);
        }
    }

    /// Reload the filtered list and re-clamp the focus into it
    pub fn refresh(&mut self, now: Instant, catalog: &dyn ChannelCatalog, favorites: &dyn FavoritesStore) {
        self.load(catalog, favorites);

        if self.channels.is_empty() {
            self.focus.grid_index = None;
            if self.focus.region == FocusRegion::Grid {
                self.focus.region = FocusRegion::Sidebar;
            }
            self.scroll.jump_to(0.0);
        } else {
            let index = self.focus.grid_index.unwrap_or(0).min(self.channels.len() - 1);
            self.set_grid_index(index, now);
        }
    }

    fn apply_filter(&mut self, now: Instant, catalog: &dyn ChannelCatalog, favorites: &dyn FavoritesStore) {
        debug!("filter -> {}", self.current_filter());
        self.focus.grid_index = None;
        self.refresh(now, catalog, favorites);
    }

    fn load(&mut self, catalog: &dyn ChannelCatalog, favorites: &dyn FavoritesStore) {
        let filter = self.current_filter().clone();
        self.channels = catalog.list_by_filter(&filter, favorites);
        self.catalog_revision = catalog.revision();
        self.favorites_revision = favorites.revision();
    }

    fn rebuild_filters(&mut self, catalog: &dyn ChannelCatalog) {
        self.filters = vec![ChannelFilter::All, ChannelFilter::Favorites];
        self.filters
            .extend(catalog.categories().into_iter().map(ChannelFilter::Category));
        self.sidebar.set_len(self.filters.len());
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Tell the browser how tall the grid viewport and one cell row are
    pub fn set_viewport(&mut self, viewport: f32, cell_height: f32, now: Instant) {
        self.viewport = viewport.max(0.0);
        self.cell_height = cell_height.max(1.0);
        self.recenter(now);
    }

    /// Largest valid scroll offset for the current list
    pub fn max_scroll(&self) -> f32 {
        let content = self.grid.rows(self.channels.len()) as f32 * self.cell_height;
        (content - self.viewport).max(0.0)
    }

    fn set_grid_index(&mut self, index: usize, now: Instant) {
        self.focus.grid_index = Some(index);
        self.recenter(now);
    }

    fn recenter(&mut self, now: Instant) {
        let Some(index) = self.focus.grid_index else {
            return;
        };
        let offset = compute_offset(
            index,
            self.grid.columns(),
            self.viewport,
            self.max_scroll(),
            self.channels.len(),
        );
        self.scroll.animate_to(offset, now);
    }
}
