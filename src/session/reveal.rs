//! Reveal Engine: types one region into the body, character by character.

use super::scroll::ScrollController;
use super::{pause, Timing};
use crate::interrupt::InterruptFlag;
use crate::model::AppError;
use crate::view::{ColorId, TerminalSurface};
use crate::view_state::coords::to_adjusted;
use crate::view_state::{LineStore, RegionId, RegionSet, ViewState};
use tracing::{debug, info};

/// Types the lines of a region at the rows they belong on.
#[derive(Debug, Clone, Copy)]
pub struct RevealEngine<'a> {
    timing: Timing,
    interrupt: &'a InterruptFlag,
}

impl<'a> RevealEngine<'a> {
    /// Engine using `timing` for character and scroll pauses.
    pub fn new(timing: Timing, interrupt: &'a InterruptFlag) -> Self {
        Self { timing, interrupt }
    }

    /// Type every line of region `id`, then mark it revealed.
    ///
    /// Each line is inserted as a new row at its adjusted position, scrolling
    /// first if that row is off screen, and folded into `store` once typed.
    ///
    /// # Errors
    ///
    /// Returns the surface error if drawing fails, `AppError::OffScreen` if the
    /// target row is still not visible after scrolling, and
    /// `AppError::Interrupted` if a signal arrives mid-reveal.
    pub fn reveal<S: TerminalSurface>(
        &self,
        regions: &mut RegionSet,
        id: RegionId,
        store: &mut LineStore,
        view: &mut ViewState,
        surface: &mut S,
    ) -> Result<(), AppError> {
        let scroller = ScrollController::new(self.timing.scroll_frame, self.interrupt);
        let char_delay = self.timing.char_delay.unwrap_or_default();
        info!(region = %regions.get(id).span(), "Revealing region");

        while let Some(line) = regions.get(id).next_pending() {
            let number = line.number();
            let text = line.text().to_string();
            let color = ColorId::for_line(line.style());

            let adjusted = to_adjusted(regions, number);
            scroller.ensure_line_visible(adjusted, store, view, surface)?;
            let row = view
                .row_of(adjusted)
                .ok_or(AppError::OffScreen { line: adjusted.get() })?;
            debug!(line = %number, %adjusted, row, "Typing line");

            surface.move_cursor(row, 0)?;
            surface.insert_line()?;
            if text.is_empty() {
                surface.refresh()?;
                pause(char_delay, self.interrupt)?;
            }
            let mut buf = [0u8; 4];
            for ch in text.chars() {
                surface.write_char(ch.encode_utf8(&mut buf), color)?;
                surface.refresh()?;
                pause(char_delay, self.interrupt)?;
            }

            let typed = regions.mark_line_typed(id);
            store.insert_at(adjusted, &typed);
        }

        regions.complete(id);
        Ok(())
    }
}
