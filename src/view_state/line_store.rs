//! Line Store: every line of the file, tagged revealed or pending.
//!
//! Lines stay at their original index forever. The "visible sequence" is the
//! subsequence of revealed lines; hiding and revealing flip a tag instead of
//! moving lines around, so original line numbers remain valid keys.

use super::types::{AdjustedLine, OriginalLine};
use crate::model::{Line, LineSpan};

/// Ordered file lines with per-line revealed/pending status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    /// One visible, normally styled line per input line.
    pub fn load<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, text)| Line::new(OriginalLine::from_index(index), text))
            .collect();
        Self { lines }
    }

    /// Total number of lines in the file, pending or not.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the file has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines in the visible sequence.
    pub fn visible_len(&self) -> usize {
        self.lines.iter().filter(|line| line.is_revealed()).count()
    }

    /// Line by original number.
    ///
    /// # Panics
    ///
    /// Panics if `number` is past the end of the file.
    pub fn get(&self, number: OriginalLine) -> &Line {
        &self.lines[number.index()]
    }

    /// All lines in original order, regardless of status.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Take `span` out of the visible sequence.
    ///
    /// Returns the lines styled Highlight and not revealed, in file order.
    ///
    /// # Panics
    ///
    /// Panics if the span reaches past the end of the file or any of its lines
    /// is already pending.
    pub fn extract_region(&mut self, span: LineSpan) -> Vec<Line> {
        let range = span.start().index()..=span.end().index();
        assert!(
            span.end().get() <= self.lines.len(),
            "region {span} past end of file ({} lines)",
            self.lines.len()
        );
        self.lines[range]
            .iter_mut()
            .map(|line| {
                assert!(line.is_revealed(), "line {} extracted twice", line.number());
                line.hide();
                line.clone()
            })
            .collect()
    }

    /// Fold a typed line back into the visible sequence at adjusted `index`.
    ///
    /// # Panics
    ///
    /// Panics if the line is not pending or `index` disagrees with where the
    /// line belongs in the visible sequence.
    pub fn insert_at(&mut self, index: AdjustedLine, line: &Line) {
        let slot = line.number().index();
        let position = self.lines[..slot]
            .iter()
            .filter(|line| line.is_revealed())
            .count()
            + 1;
        assert_eq!(
            position,
            index.get(),
            "line {} belongs at visible position {position}, not {index}",
            line.number()
        );
        let target = &mut self.lines[slot];
        assert!(!target.is_revealed(), "line {} is already visible", line.number());
        target.reveal();
    }

    /// Up to `count` visible lines starting at adjusted `top_line`.
    pub fn visible_slice(&self, top_line: AdjustedLine, count: usize) -> Vec<&Line> {
        self.lines
            .iter()
            .filter(|line| line.is_revealed())
            .skip(top_line.get() - 1)
            .take(count)
            .collect()
    }
}
