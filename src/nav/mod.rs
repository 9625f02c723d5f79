//! Remote-control navigation: grid focus, scroll centering, back handling
//! and the channel browser built from them

pub mod back;
pub mod browse;
pub mod grid;
pub mod list;
pub mod scroll;

pub use back::{BackDebouncer, ExitConfirm, ExitDecision};
pub use browse::{BrowseOutcome, ChannelBrowser, NavigationFocus, HEADER_TABS};
pub use grid::{Direction, FocusGrid, FocusRegion, FocusTarget};
pub use list::ListState;
pub use scroll::{compute_offset, ScrollAnimator};
