//! Scroll Controller: animated, one line per frame.

use super::{draw_view, pause};
use crate::interrupt::InterruptFlag;
use crate::model::AppError;
use crate::view::TerminalSurface;
use crate::view_state::coords::to_adjusted;
use crate::view_state::scroll::{line_delta, scroll_delta};
use crate::view_state::{AdjustedLine, LineStore, RegionId, RegionSet, ViewState};
use std::time::Duration;
use tracing::debug;

/// Moves the viewport so a region or line is on screen.
#[derive(Debug, Clone, Copy)]
pub struct ScrollController<'a> {
    frame: Duration,
    interrupt: &'a InterruptFlag,
}

impl<'a> ScrollController<'a> {
    /// Controller pausing `frame` after every one-line step.
    pub fn new(frame: Duration, interrupt: &'a InterruptFlag) -> Self {
        Self { frame, interrupt }
    }

    /// Bring region `id` into view. Returns the signed number of lines scrolled.
    ///
    /// # Errors
    ///
    /// Returns the surface error if a frame cannot be drawn, or
    /// `AppError::Interrupted` if a signal arrives mid-animation.
    pub fn ensure_visible<S: TerminalSurface>(
        &self,
        regions: &RegionSet,
        id: RegionId,
        store: &LineStore,
        view: &mut ViewState,
        surface: &mut S,
    ) -> Result<isize, AppError> {
        let region = regions.get(id);
        let start = to_adjusted(regions, region.span().start());
        let delta = scroll_delta(start, region.size(), view);
        debug!(region = %region.span(), %start, delta, "Scrolling to region");
        self.animate(delta, store, view, surface)?;
        Ok(delta)
    }

    /// Bring the single adjusted `line` into view.
    ///
    /// # Errors
    ///
    /// Same as [`ScrollController::ensure_visible`].
    pub fn ensure_line_visible<S: TerminalSurface>(
        &self,
        line: AdjustedLine,
        store: &LineStore,
        view: &mut ViewState,
        surface: &mut S,
    ) -> Result<isize, AppError> {
        let delta = line_delta(line, view);
        self.animate(delta, store, view, surface)?;
        Ok(delta)
    }

    fn animate<S: TerminalSurface>(
        &self,
        delta: isize,
        store: &LineStore,
        view: &mut ViewState,
        surface: &mut S,
    ) -> Result<(), AppError> {
        for _ in 0..delta.unsigned_abs() {
            view.top_line = if delta > 0 {
                view.top_line.saturating_add(1)
            } else {
                view.top_line.saturating_sub(1)
            };
            draw_view(store, view, surface)?;
            surface.refresh()?;
            pause(self.frame, self.interrupt)?;
        }
        Ok(())
    }
}
