//! Reveal Region Set: the line ranges that start hidden.
//!
//! All pending-line arithmetic lives in [`current_adjust_for`]. Everything that
//! needs to know where a line sits on screen goes through it.

use super::line_store::LineStore;
use super::types::OriginalLine;
use crate::model::span::sort_disjoint;
use crate::model::{AreaError, Line, LineSpan};
use tracing::debug;

/// Position of a region in ascending start order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(usize);

impl RegionId {
    /// Raw 0-based index.
    pub fn get(&self) -> usize {
        self.0
    }
}

/// A contiguous line range that is revealed by simulated typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    span: LineSpan,
    preceding_pending_adjust: usize,
    lines: Vec<Line>,
    typed: usize,
    revealed: bool,
}

impl Region {
    /// Original line range.
    pub fn span(&self) -> LineSpan {
        self.span
    }

    /// Number of lines in the region.
    pub fn size(&self) -> usize {
        self.lines.len()
    }

    /// Pending lines of other regions that lie entirely before this one.
    pub fn preceding_pending_adjust(&self) -> usize {
        self.preceding_pending_adjust
    }

    /// The region's lines, in file order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whether every line has been typed.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Lines of this region still hidden.
    pub fn pending_count(&self) -> usize {
        if self.revealed {
            0
        } else {
            self.lines.len() - self.typed
        }
    }

    /// The line that will be typed next.
    pub fn next_pending(&self) -> Option<&Line> {
        if self.revealed {
            return None;
        }
        self.lines.get(self.typed)
    }

    /// Hidden lines of this region strictly before `line`.
    fn pending_before(&self, line: OriginalLine) -> usize {
        let first_pending = self.span.start().get() + self.typed;
        line.get()
            .saturating_sub(first_pending)
            .min(self.pending_count())
    }
}

/// Number of pending lines strictly before `line`.
///
/// Revealed regions contribute nothing; a region being typed contributes only
/// the lines not yet typed. Subtracting this from `line` gives its adjusted
/// number, which for a pending line is the row it will be inserted at.
pub fn current_adjust_for(regions: &[Region], line: OriginalLine) -> usize {
    regions
        .iter()
        .take_while(|region| region.span.start() < line)
        .map(|region| region.pending_before(line))
        .sum()
}

/// All regions of a session, in ascending start order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// Validate `spans`, hide their lines in `store` and build the set.
    ///
    /// Spans may arrive in any order; they are revealed in ascending start order.
    ///
    /// # Errors
    ///
    /// Returns `AreaError::Overlap` if two spans share a line and
    /// `AreaError::OutOfBounds` if a span reaches past the end of the file.
    /// The store is left untouched on error.
    pub fn register(spans: &[LineSpan], store: &mut LineStore) -> Result<Self, AreaError> {
        let mut spans = spans.to_vec();
        sort_disjoint(&mut spans)?;

        if let Some(span) = spans.iter().find(|span| span.end().get() > store.len()) {
            return Err(AreaError::OutOfBounds {
                span: *span,
                line_count: store.len(),
            });
        }

        let mut pending_so_far = 0;
        let regions = spans
            .into_iter()
            .map(|span| {
                let region = Region {
                    span,
                    preceding_pending_adjust: pending_so_far,
                    lines: store.extract_region(span),
                    typed: 0,
                    revealed: false,
                };
                pending_so_far += span.len();
                debug!(
                    region = %span,
                    adjust = region.preceding_pending_adjust,
                    "Registered region"
                );
                region
            })
            .collect();

        Ok(Self { regions })
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions were configured.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this set.
    pub fn get(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    /// Regions in ascending start order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// See [`current_adjust_for`].
    pub fn current_adjust_for(&self, line: OriginalLine) -> usize {
        current_adjust_for(&self.regions, line)
    }

    /// Every region id, in ascending start order.
    #[cfg(test)]
    pub(crate) fn ids(&self) -> impl Iterator<Item = RegionId> {
        (0..self.regions.len()).map(RegionId)
    }

    /// Total hidden lines across all regions.
    pub fn pending_lines(&self) -> usize {
        self.regions.iter().map(Region::pending_count).sum()
    }

    /// Earliest region not yet revealed.
    pub fn next_unrevealed(&self) -> Option<RegionId> {
        self.regions
            .iter()
            .position(|region| !region.revealed)
            .map(RegionId)
    }

    /// Record that the next line of `id` has been typed.
    ///
    /// Returns the line that was typed.
    ///
    /// # Panics
    ///
    /// Panics if every line of the region has already been typed.
    pub fn mark_line_typed(&mut self, id: RegionId) -> Line {
        let region = &mut self.regions[id.0];
        assert!(
            region.typed < region.lines.len(),
            "region {} has no lines left to type",
            region.span
        );
        let line = &mut region.lines[region.typed];
        line.reveal();
        region.typed += 1;
        line.clone()
    }

    /// Flip `id` to revealed and release its lines from later regions' adjust.
    ///
    /// # Panics
    ///
    /// Panics if the region still has untyped lines.
    pub fn complete(&mut self, id: RegionId) {
        let size = {
            let region = &mut self.regions[id.0];
            assert_eq!(
                region.typed,
                region.lines.len(),
                "region {} completed before all lines were typed",
                region.span
            );
            region.revealed = true;
            region.lines.len()
        };
        for later in &mut self.regions[id.0 + 1..] {
            later.preceding_pending_adjust = later.preceding_pending_adjust.saturating_sub(size);
        }
    }

    /// Type every remaining line of `id` at once, without rendering.
    ///
    /// Returns the typed lines.
    #[cfg(test)]
    pub(crate) fn reveal_all(&mut self, id: RegionId) -> Vec<Line> {
        let remaining = self.get(id).size() - self.get(id).typed;
        let lines: Vec<Line> = (0..remaining).map(|_| self.mark_line_typed(id)).collect();
        self.complete(id);
        lines
    }
}
