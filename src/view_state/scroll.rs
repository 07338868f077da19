//! Scroll policy: how far to move the viewport so a block of lines fits.
//!
//! Pure arithmetic on `ViewState`. The animated, frame-by-frame movement
//! lives in `session::scroll`.

use super::coords::to_row;
use super::types::{AdjustedLine, ViewState};

/// Signed number of lines to scroll so `size` lines starting at `start` are on screen.
///
/// - Block starts above the viewport: scroll back until it is the top line.
/// - Block ends below the viewport: scroll forward until its last line is the
///   bottom row, or until its first line is the top row when the block is
///   taller than the viewport.
/// - Otherwise zero.
pub fn scroll_delta(start: AdjustedLine, size: usize, view: &ViewState) -> isize {
    let size = size.max(1);
    let start_row = to_row(start, view.top_line);

    if start_row < 0 {
        return start_row;
    }

    let height = view.height as isize;
    let end_row = start_row + size as isize - 1;
    if end_row >= height {
        return if size >= view.height {
            start_row
        } else {
            end_row + 1 - height
        };
    }

    0
}

/// Signed number of lines to scroll so the single `line` is on screen.
pub fn line_delta(line: AdjustedLine, view: &ViewState) -> isize {
    scroll_delta(line, 1, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(top: usize, height: usize) -> ViewState {
        ViewState::new(AdjustedLine::new(top), height, 80)
    }

    #[test]
    fn visible_block_needs_no_scroll() {
        assert_eq!(scroll_delta(AdjustedLine::new(3), 1, &view(1, 20)), 0);
        assert_eq!(scroll_delta(AdjustedLine::new(15), 6, &view(1, 20)), 0);
    }

    #[test]
    fn block_below_viewport_scrolls_until_fully_visible() {
        // 100-line file, height 20, region 50-55: top goes 1 -> 36.
        let delta = scroll_delta(AdjustedLine::new(50), 6, &view(1, 20));
        assert_eq!(delta, 35);
        assert_eq!(1 + delta, 50 - 20 + 6);
    }

    #[test]
    fn block_straddling_bottom_edge_scrolls_forward() {
        // Rows 1..=10 visible, block 9..=12.
        assert_eq!(scroll_delta(AdjustedLine::new(9), 4, &view(1, 10)), 2);
    }

    #[test]
    fn block_above_viewport_scrolls_back_to_its_start() {
        assert_eq!(scroll_delta(AdjustedLine::new(5), 3, &view(40, 20)), -35);
    }

    #[test]
    fn block_taller_than_viewport_puts_start_on_top() {
        assert_eq!(scroll_delta(AdjustedLine::new(30), 50, &view(1, 20)), 29);
    }

    #[test]
    fn line_just_below_bottom_scrolls_one() {
        assert_eq!(line_delta(AdjustedLine::new(21), &view(1, 20)), 1);
        assert_eq!(line_delta(AdjustedLine::new(20), &view(1, 20)), 0);
    }

    #[test]
    fn scrolled_view_contains_the_block() {
        for (top, start, size) in [(1, 50, 6), (60, 5, 3), (1, 18, 5), (10, 10, 25)] {
            let mut v = view(top, 20);
            let delta = scroll_delta(AdjustedLine::new(start), size, &v);
            v.top_line = AdjustedLine::new((top as isize + delta) as usize);
            assert!(v.contains(AdjustedLine::new(start)), "start visible for {start}");
            if size <= v.height {
                assert!(v.contains(AdjustedLine::new(start + size - 1)));
            }
        }
    }
}
