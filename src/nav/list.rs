//! One-dimensional selection (sidebar categories, home menu, header tabs,
//! guide programs). Movement clamps at both ends; nothing here wraps.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub selected: usize,
    /// First row of the visible window
    pub offset: usize,
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    fn last(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Step towards the start; false when already there
    pub fn up(&mut self) -> bool {
        let Some(prev) = self.selected.checked_sub(1) else {
            return false;
        };
        self.selected = prev;
        self.offset = self.offset.min(prev);
        true
    }

    /// Step towards the end; false when already there or empty
    pub fn down(&mut self) -> bool {
        if self.selected >= self.last() {
            return false;
        }
        self.selected += 1;
        true
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.last());
    }

    /// Slide the window so `selected` sits inside `rows` visible rows
    pub fn scroll_into_view(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        let lowest_offset = (self.selected + 1).saturating_sub(rows);
        self.offset = self.offset.clamp(lowest_offset, self.selected);
    }

    /// The backing list changed size; keep the selection inside it
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.selected = self.selected.min(self.last());
        self.offset = self.offset.min(self.selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_clamp_at_both_ends() {
        let mut list = ListState::new(3);
        assert!(!list.up());
        assert!(list.down());
        assert!(list.down());
        assert!(!list.down());
        assert_eq!(list.selected, 2);
        assert!(list.up());
        assert_eq!(list.selected, 1);
    }

    #[test]
    fn test_empty_list_never_moves() {
        let mut list = ListState::new(0);
        assert!(!list.down());
        assert!(!list.up());
        list.select(3);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_shrinking_reclamps_selection() {
        let mut list = ListState::new(10);
        list.selected = 8;
        list.offset = 6;

        list.set_len(5);
        assert_eq!((list.selected, list.offset), (4, 4));

        list.set_len(10);
        assert_eq!(list.selected, 4);

        list.set_len(0);
        assert_eq!((list.selected, list.offset), (0, 0));
    }

    #[test]
    fn test_window_follows_selection() {
        let mut list = ListState::new(20);
        list.select(7);
        list.scroll_into_view(5);
        assert_eq!(list.offset, 3);

        list.select(1);
        list.scroll_into_view(5);
        assert_eq!(list.offset, 1);

        // Already visible: the window stays put
        list.select(4);
        list.scroll_into_view(5);
        assert_eq!(list.offset, 1);
    }
}
