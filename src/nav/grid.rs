//! Spatial D-pad navigation over a channel grid
//!
//! The grid is a flat list laid out in `columns` columns. Moving off the top
//! row hands focus to the header; moving left off the first column hands it
//! to the sidebar, but only while the user is driving with a remote.

use serde::{Deserialize, Serialize};

/// A directional key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which region of the screen owns focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusRegion {
    Header,
    Sidebar,
    #[default]
    Grid,
    Overlay,
}

/// Where focus goes after a key press on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Stay in the grid at this index
    Grid(usize),
    /// Hand off to the header at this tab
    Header(usize),
    /// Hand off to the sidebar at its remembered category
    Sidebar(usize),
    /// Open the channel at this index
    Activate(usize),
    /// Nothing to do (empty grid, out-of-range index)
    Stay,
}

/// Grid geometry for focus movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusGrid {
    columns: usize,
}

impl FocusGrid {
    /// A zero column count is treated as a single column
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows needed for `len` items
    pub fn rows(&self, len: usize) -> usize {
        len.div_ceil(self.columns)
    }

    /// Compute the focus target for a directional key
    ///
    /// `sidebar_index` is the sidebar's remembered selection, used when focus
    /// leaves through the left edge.
    pub fn move_focus(
        &self,
        index: usize,
        direction: Direction,
        len: usize,
        dpad_mode: bool,
        sidebar_index: usize,
    ) -> FocusTarget {
        if len == 0 {
            return FocusTarget::Stay;
        }
        let index = index.min(len - 1);
        let columns = self.columns;

        match direction {
            Direction::Up if index < columns => FocusTarget::Header(0),
            Direction::Up => FocusTarget::Grid(index - columns),
            Direction::Down => FocusTarget::Grid((index + columns).min(len - 1)),
            Direction::Left if index % columns == 0 && dpad_mode => {
                FocusTarget::Sidebar(sidebar_index)
            }
            Direction::Left => FocusTarget::Grid(index.saturating_sub(1)),
            Direction::Right => FocusTarget::Grid((index + 1).min(len - 1)),
        }
    }

    /// Enter/Select on the grid
    pub fn activate(&self, index: usize, len: usize) -> FocusTarget {
        if index < len {
            FocusTarget::Activate(index)
        } else {
            FocusTarget::Stay
        }
    }
}
