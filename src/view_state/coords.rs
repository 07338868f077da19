//! Coordinate Translator: original line -> adjusted line -> viewport row.
//!
//! Both the scroll controller and the reveal engine go through these two
//! functions, so they always agree on where a character lands.

use super::regions::RegionSet;
use super::types::{AdjustedLine, OriginalLine};

/// Position of `line` in the currently visible buffer.
///
/// For a pending line this is the position it will take once typed.
pub fn to_adjusted(regions: &RegionSet, line: OriginalLine) -> AdjustedLine {
    AdjustedLine::new(line.get() - regions.current_adjust_for(line))
}

/// 0-based viewport row of `line` when `top_line` is on row 0.
///
/// Negative or `>= height` means off screen; scroll first.
pub fn to_row(line: AdjustedLine, top_line: AdjustedLine) -> isize {
    line.get() as isize - top_line.get() as isize
}
