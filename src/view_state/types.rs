//! Core view-state newtypes

use super::coords::to_row;
use std::fmt;

/// Line number in the file as it exists on disk. 1-based.
///
/// Index-stable: an original line keeps its number no matter how many
/// regions are pending or revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OriginalLine(usize);

/// Error returned when a 1-based line number of zero is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("line numbers start at 1 (got 0)")]
pub struct ZeroLineNumber;

impl OriginalLine {
    /// First line of any file.
    pub const FIRST: Self = Self(1);

    /// Smart constructor that rejects zero.
    pub fn new(number: usize) -> Result<Self, ZeroLineNumber> {
        if number == 0 {
            Err(ZeroLineNumber)
        } else {
            Ok(Self(number))
        }
    }

    /// Build from a 0-based index into the file.
    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// Get the raw 1-based value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// 0-based index into the file.
    pub fn index(&self) -> usize {
        self.0 - 1
    }

    /// Line `amount` lines further down.
    pub fn offset(&self, amount: usize) -> Self {
        Self(self.0 + amount)
    }
}

impl fmt::Display for OriginalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Line number in the currently visible buffer. 1-based.
///
/// Shifts whenever pending lines before it are revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdjustedLine(usize);

impl AdjustedLine {
    /// Top of the buffer.
    pub const FIRST: Self = Self(1);

    /// Create an adjusted line, clamping zero up to the first line.
    pub fn new(number: usize) -> Self {
        Self(number.max(1))
    }

    /// Get the raw 1-based value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Move down by `amount`, saturating at `usize::MAX`.
    pub fn saturating_add(&self, amount: usize) -> Self {
        Self(self.0.saturating_add(amount))
    }

    /// Move up by `amount`, never going above the first line.
    pub fn saturating_sub(&self, amount: usize) -> Self {
        Self::new(self.0.saturating_sub(amount))
    }
}

impl fmt::Display for AdjustedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The visible window of rows into the line buffer.
///
/// Created from the terminal size at startup. Only the scroll controller
/// moves `top_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// Adjusted line shown on row 0.
    pub top_line: AdjustedLine,
    /// Body height in rows. Always >= 1.
    pub height: usize,
    /// Body width in columns.
    pub width: usize,
}

impl ViewState {
    /// Create a view with `top_line` at the top. Height is clamped to at least one row.
    pub fn new(top_line: AdjustedLine, height: usize, width: usize) -> Self {
        Self {
            top_line,
            height: height.max(1),
            width,
        }
    }

    /// Adjusted line shown on the last row.
    pub fn bottom_line(&self) -> AdjustedLine {
        self.top_line.saturating_add(self.height - 1)
    }

    /// Whether `line` currently sits on one of the viewport rows.
    pub fn contains(&self, line: AdjustedLine) -> bool {
        line >= self.top_line && line <= self.bottom_line()
    }

    /// On-screen row for `line`, if it is visible.
    pub fn row_of(&self, line: AdjustedLine) -> Option<u16> {
        let row = to_row(line, self.top_line);
        if row < 0 || row >= self.height as isize {
            return None;
        }
        u16::try_from(row).ok()
    }
}
