//! Scroll window and row cursor for one list pane

use super::{Navigation, NoOpReason};

/// Cursor over a paginated list
///
/// `offset` is the index of the first visible item and `row` is the cursor
/// position inside the viewport. The selected item is `offset + row`.
/// `offset` only moves when the row cursor would otherwise leave the
/// viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    offset: usize,
    row: usize,
}

impl NavigationCursor {
    /// Cursor at the first item
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the first visible item
    pub fn scroll_offset(&self) -> usize {
        self.offset
    }

    /// Row of the cursor inside the viewport
    pub fn row(&self) -> usize {
        self.row
    }

    /// Absolute index of the item under the cursor
    pub fn position(&self) -> usize {
        self.offset + self.row
    }

    /// Return to the first item
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Put the cursor on `index`, keeping the scroll window when it already
    /// starts at or above it. [`NavigationCursor::normalize`] fits the row to
    /// the viewport afterwards.
    pub fn focus(&mut self, index: usize) {
        if index >= self.offset {
            self.row = index - self.offset;
        } else {
            self.offset = index;
            self.row = 0;
        }
    }

    /// Fit the cursor to a viewport of `height` rows over `total` items.
    ///
    /// The absolute position is kept when it still exists, otherwise the
    /// cursor lands on the last item. A zero-row viewport parks the window on
    /// the cursor item so a later resize restores the same position.
    pub fn normalize(&mut self, total: usize, height: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        let position = self.position().min(total - 1);
        if height == 0 {
            self.offset = position;
            self.row = 0;
            return;
        }
        let limit = height.min(total);
        // keep the first visible item when possible
        let mut offset = self.offset.min(position);
        if position - offset >= limit {
            offset = position + 1 - limit;
        }
        // no blank rows below the last item when the list could fill them
        offset = offset.min(total.saturating_sub(height));
        self.offset = offset;
        self.row = position - offset;
    }

    /// Move one item down
    pub fn move_down(&mut self, total: usize, height: usize) -> Navigation {
        if total == 0 || height == 0 {
            return Navigation::NoOp(NoOpReason::Empty);
        }
        self.normalize(total, height);

        let limit = height.min(total);
        if self.row + 1 < limit && self.offset + self.row + 1 < total {
            self.row += 1;
            Navigation::Moved
        } else if self.offset + height < total {
            self.offset += 1;
            self.row = limit - 1;
            Navigation::Scrolled
        } else {
            Navigation::NoOp(NoOpReason::AtBottom)
        }
    }

    /// Move one item up
    pub fn move_up(&mut self, total: usize, height: usize) -> Navigation {
        if total == 0 || height == 0 {
            return Navigation::NoOp(NoOpReason::Empty);
        }
        self.normalize(total, height);

        if self.row > 0 {
            self.row -= 1;
            Navigation::Moved
        } else if self.offset > 0 {
            self.offset -= 1;
            Navigation::Scrolled
        } else {
            Navigation::NoOp(NoOpReason::AtTop)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_down_within_viewport() {
        let mut c = NavigationCursor::new();
        assert_eq!(c.move_down(10, 3), Navigation::Moved);
        assert_eq!((c.scroll_offset(), c.row()), (0, 1));
        assert_eq!(c.move_down(10, 3), Navigation::Moved);
        assert_eq!((c.scroll_offset(), c.row()), (0, 2));
    }

    #[test]
    fn test_move_down_scrolls_at_last_row() {
        let mut c = NavigationCursor::new();
        c.move_down(5, 3);
        c.move_down(5, 3);
        assert_eq!(c.move_down(5, 3), Navigation::Scrolled);
        assert_eq!((c.scroll_offset(), c.row()), (1, 2));
        assert_eq!(c.move_down(5, 3), Navigation::Scrolled);
        assert_eq!((c.scroll_offset(), c.row()), (2, 2));
        assert_eq!(c.move_down(5, 3), Navigation::NoOp(NoOpReason::AtBottom));
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn test_move_down_short_list_stops_at_last_item() {
        let mut c = NavigationCursor::new();
        assert_eq!(c.move_down(2, 10), Navigation::Moved);
        assert_eq!(c.move_down(2, 10), Navigation::NoOp(NoOpReason::AtBottom));
        assert_eq!((c.scroll_offset(), c.row()), (0, 1));
    }

    #[test]
    fn test_repeated_move_down_clamps_at_last_item() {
        for (total, height) in [(1, 1), (1, 5), (7, 3), (3, 3), (4, 3), (20, 1)] {
            let mut c = NavigationCursor::new();
            for _ in 0..total + 3 {
                c.move_down(total, height);
            }
            assert_eq!(c.position(), total - 1, "total={} height={}", total, height);
            let before = c;
            assert_eq!(c.move_down(total, height), Navigation::NoOp(NoOpReason::AtBottom));
            assert_eq!(c, before);
        }
    }

    #[test]
    fn test_move_up_from_start_is_noop() {
        let mut c = NavigationCursor::new();
        assert_eq!(c.move_up(5, 3), Navigation::NoOp(NoOpReason::AtTop));
        assert_eq!(c, NavigationCursor::new());
    }

    #[test]
    fn test_move_up_scrolls_back() {
        let mut c = NavigationCursor::new();
        for _ in 0..4 {
            c.move_down(5, 3);
        }
        assert_eq!((c.scroll_offset(), c.row()), (2, 2));
        assert_eq!(c.move_up(5, 3), Navigation::Moved);
        assert_eq!(c.move_up(5, 3), Navigation::Moved);
        assert_eq!((c.scroll_offset(), c.row()), (2, 0));
        assert_eq!(c.move_up(5, 3), Navigation::Scrolled);
        assert_eq!((c.scroll_offset(), c.row()), (1, 0));
    }

    #[test]
    fn test_empty_list() {
        let mut c = NavigationCursor::new();
        assert_eq!(c.move_down(0, 3), Navigation::NoOp(NoOpReason::Empty));
        assert_eq!(c.move_up(3, 0), Navigation::NoOp(NoOpReason::Empty));
    }

    #[test]
    fn test_normalize_after_viewport_shrinks() {
        let mut c = NavigationCursor::new();
        for _ in 0..5 {
            c.move_down(10, 8);
        }
        assert_eq!((c.scroll_offset(), c.row()), (0, 5));

        c.normalize(10, 3);
        assert_eq!(c.position(), 5);
        assert!(c.row() < 3);
    }

    #[test]
    fn test_focus_keeps_window() {
        let mut c = NavigationCursor::new();
        for _ in 0..6 {
            c.move_down(10, 3);
        }
        assert_eq!((c.scroll_offset(), c.row()), (4, 2));

        c.focus(5);
        assert_eq!((c.scroll_offset(), c.row()), (4, 1));
        c.focus(1);
        assert_eq!((c.scroll_offset(), c.row()), (1, 0));
    }

    #[test]
    fn test_normalize_after_list_shrinks() {
        let mut c = NavigationCursor::new();
        for _ in 0..9 {
            c.move_down(10, 3);
        }
        assert_eq!(c.position(), 9);

        c.normalize(4, 3);
        assert_eq!(c.position(), 3);
        assert_eq!((c.scroll_offset(), c.row()), (1, 2));
    }

    #[test]
    fn test_normalize_zero_height_keeps_position() {
        let mut c = NavigationCursor::new();
        c.move_down(3, 5);
        c.move_down(3, 5);

        c.normalize(3, 0);
        assert_eq!(c.position(), 2);

        c.normalize(3, 5);
        assert_eq!(c.position(), 2);
        assert_eq!((c.scroll_offset(), c.row()), (0, 2));
    }

    #[test]
    fn test_normalize_zero_height_clamps_to_last_item() {
        let mut c = NavigationCursor::new();
        for _ in 0..6 {
            c.move_down(10, 3);
        }
        c.normalize(4, 0);
        assert_eq!(c.position(), 3);
        c.normalize(0, 0);
        assert_eq!(c, NavigationCursor::new());
    }
}
