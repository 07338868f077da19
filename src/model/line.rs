//! A single line of the presented file.

use crate::view_state::types::OriginalLine;

/// Display styling for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    /// Static context, shown immediately.
    #[default]
    Normal,
    /// Part of a typed region.
    Highlight,
}

/// One line of the file, keyed by its original line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    number: OriginalLine,
    text: String,
    style: LineStyle,
    revealed: bool,
}

impl Line {
    /// Create a visible, normally styled line.
    pub fn new(number: OriginalLine, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            style: LineStyle::Normal,
            revealed: true,
        }
    }

    /// Original line number.
    pub fn number(&self) -> OriginalLine {
        self.number
    }

    /// Line content without the trailing separator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current display style.
    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// Whether the line is part of the visible sequence.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub(crate) fn hide(&mut self) {
        self.revealed = false;
        self.style = LineStyle::Highlight;
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_line_is_visible_and_normal() {
        let line = Line::new(OriginalLine::FIRST, "fn main() {}");
        assert!(line.is_revealed());
        assert_eq!(line.style(), LineStyle::Normal);
        assert_eq!(line.text(), "fn main() {}");
    }

    #[test]
    fn hidden_line_is_highlighted_until_revealed() {
        let mut line = Line::new(OriginalLine::FIRST, "x");
        line.hide();
        assert!(!line.is_revealed());
        assert_eq!(line.style(), LineStyle::Highlight);

        line.reveal();
        assert!(line.is_revealed());
        assert_eq!(line.style(), LineStyle::Highlight, "typed lines keep their highlight");
    }
}
