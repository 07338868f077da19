//! Session Driver: load, render the static view, then reveal region by region.
//!
//! The driver owns the pure state (line store, regions, viewport) and talks
//! to the terminal only through a [`TerminalSurface`]. The surface is shut
//! down exactly once on every exit path, including panics.

pub mod reveal;
pub mod scroll;

pub use reveal::RevealEngine;
pub use scroll::ScrollController;

use crate::interrupt::InterruptFlag;
use crate::model::{AppError, KeyAction, LineSpan};
use crate::source::FileSource;
use crate::view::{ColorId, Palette, TerminalSurface};
use crate::view_state::{AdjustedLine, LineStore, RegionId, RegionSet, ViewState};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Smallest body the presenter will draw into.
const MIN_BODY_WIDTH: u16 = 1;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// File read and regions registered, terminal not touched yet.
    Loading,
    /// Drawing the static view.
    RenderingStatic,
    /// Waiting for the presenter before bringing a region into view.
    AwaitingScroll(RegionId),
    /// Typing a region.
    Revealing(RegionId),
    /// Every region revealed, or aborted.
    Done,
}

/// How a session that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every region was revealed.
    Completed,
    /// The presenter pressed the abort key.
    Aborted,
}

/// Pauses between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause after each typed character; `None` types instantly.
    pub char_delay: Option<Duration>,
    /// Pause after each one-line scroll step.
    pub scroll_frame: Duration,
}

impl Timing {
    /// No pauses at all.
    pub const INSTANT: Self = Self {
        char_delay: None,
        scroll_frame: Duration::ZERO,
    };

    /// Build from the resolved configuration values.
    pub fn from_config(delay_secs: Option<f64>, scroll_delay_ms: u64) -> Self {
        Self {
            char_delay: delay_secs.and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
            scroll_frame: Duration::from_millis(scroll_delay_ms),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            char_delay: None,
            scroll_frame: Duration::from_millis(30),
        }
    }
}

/// Everything a session needs besides the file and its regions.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Frame pauses.
    pub timing: Timing,
    /// Adjusted line shown on the top row of the static view.
    pub page: usize,
    /// Gutter width in columns.
    pub gutter_width: u16,
    /// Colors registered with the surface.
    pub palette: Palette,
    /// Set when a termination signal arrives.
    pub interrupt: InterruptFlag,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            page: 1,
            gutter_width: 4,
            palette: Palette::default(),
            interrupt: InterruptFlag::new(),
        }
    }
}

/// Sleep for `duration` unless a termination signal arrives.
///
/// # Errors
///
/// Returns `AppError::Interrupted` if the interrupt flag is set before or
/// after the pause.
pub fn pause(duration: Duration, interrupt: &InterruptFlag) -> Result<(), AppError> {
    if interrupt.is_set() {
        return Err(AppError::Interrupted);
    }
    if !duration.is_zero() {
        thread::sleep(duration);
    }
    if interrupt.is_set() {
        return Err(AppError::Interrupted);
    }
    Ok(())
}

/// Clear the body and draw the gutter and the visible slice for `view`.
///
/// Does not refresh.
///
/// # Errors
///
/// Returns the surface error if any drawing call fails.
pub fn draw_view<S: TerminalSurface>(
    store: &LineStore,
    view: &ViewState,
    surface: &mut S,
) -> Result<(), AppError> {
    surface.clear_body()?;
    for row in 0..view.height {
        let row_index = u16::try_from(row).map_err(|_| AppError::OffScreen {
            line: view.top_line.get() + row,
        })?;
        surface.write_gutter_line(row_index, view.top_line.get() + row)?;
    }
    for (row, line) in store
        .visible_slice(view.top_line, view.height)
        .into_iter()
        .enumerate()
    {
        let row_index = u16::try_from(row).map_err(|_| AppError::OffScreen {
            line: view.top_line.get() + row,
        })?;
        surface.move_cursor(row_index, 0)?;
        surface.write_char(line.text(), ColorId::for_line(line.style()))?;
    }
    Ok(())
}

/// Shuts the surface down when dropped, unless `finish` already did.
struct SurfaceGuard<'a, S: TerminalSurface> {
    surface: &'a mut S,
    finished: bool,
}

impl<'a, S: TerminalSurface> SurfaceGuard<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        Self {
            surface,
            finished: false,
        }
    }

    fn surface(&mut self) -> &mut S {
        &mut *self.surface
    }

    fn finish(mut self) -> Result<(), AppError> {
        self.finished = true;
        self.surface.shutdown()?;
        Ok(())
    }
}

impl<S: TerminalSurface> Drop for SurfaceGuard<'_, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.surface.shutdown() {
            warn!(error = %err, "Terminal shutdown failed during unwind");
        }
    }
}

/// One presentation of one file.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    store: LineStore,
    regions: RegionSet,
    view: ViewState,
    options: SessionOptions,
}

impl Session {
    /// Read `path` and register `spans`.
    ///
    /// Runs before the terminal is touched, so failures here leave it alone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Input` if the file cannot be read and
    /// `AppError::Area` for overlapping or out-of-range spans.
    pub fn load(
        path: impl AsRef<Path>,
        spans: &[LineSpan],
        options: SessionOptions,
    ) -> Result<Self, AppError> {
        let source = FileSource::new(path)?;
        Self::from_lines(source.into_lines(), spans, options)
    }

    /// Build a session from lines already in memory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Area` for overlapping or out-of-range spans.
    pub fn from_lines<I, T>(
        lines: I,
        spans: &[LineSpan],
        options: SessionOptions,
    ) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut store = LineStore::load(lines);
        let regions = RegionSet::register(spans, &mut store)?;
        info!(
            lines = store.len(),
            regions = regions.len(),
            pending = regions.pending_lines(),
            "Session loaded"
        );
        Ok(Self {
            state: SessionState::Loading,
            store,
            regions,
            view: ViewState::new(AdjustedLine::new(options.page), 1, 0),
            options,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The line store.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// The registered regions.
    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// The viewport.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Present the file on `surface` until every region is revealed or the
    /// presenter aborts.
    ///
    /// `surface.shutdown()` runs exactly once whatever happens.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while presenting, or the shutdown error
    /// if presenting succeeded but restoring the terminal did not.
    pub fn run<S: TerminalSurface>(&mut self, surface: &mut S) -> Result<SessionOutcome, AppError> {
        let mut guard = SurfaceGuard::new(surface);
        let result = self.present(guard.surface());
        self.transition(SessionState::Done);

        match result {
            Ok(outcome) => {
                guard.finish()?;
                info!(?outcome, "Session finished");
                Ok(outcome)
            }
            Err(err) => {
                if err.is_interrupt() {
                    warn!("Session interrupted by signal");
                } else {
                    error!(error = %err, "Session failed");
                }
                if let Err(shutdown_err) = guard.finish() {
                    warn!(error = %shutdown_err, "Terminal shutdown failed after error");
                }
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Session state");
        self.state = next;
    }

    fn present<S: TerminalSurface>(&mut self, surface: &mut S) -> Result<SessionOutcome, AppError> {
        self.transition(SessionState::RenderingStatic);
        self.render_static(surface)?;

        while let Some(id) = self.regions.next_unrevealed() {
            self.transition(SessionState::AwaitingScroll(id));
            if surface.wait_key()? == KeyAction::Quit {
                info!(region = %self.regions.get(id).span(), "Aborted before region");
                return Ok(SessionOutcome::Aborted);
            }

            let scroller =
                ScrollController::new(self.options.timing.scroll_frame, &self.options.interrupt);
            let scrolled = scroller.ensure_visible(
                &self.regions,
                id,
                &self.store,
                &mut self.view,
                surface,
            )?;
            if scrolled != 0 && surface.wait_key()? == KeyAction::Quit {
                info!(region = %self.regions.get(id).span(), "Aborted after scroll");
                return Ok(SessionOutcome::Aborted);
            }

            self.transition(SessionState::Revealing(id));
            let engine = RevealEngine::new(self.options.timing, &self.options.interrupt);
            engine.reveal(
                &mut self.regions,
                id,
                &mut self.store,
                &mut self.view,
                surface,
            )?;
        }

        surface.beep()?;
        surface.wait_key()?;
        Ok(SessionOutcome::Completed)
    }

    fn render_static<S: TerminalSurface>(&mut self, surface: &mut S) -> Result<(), AppError> {
        let (height, width) = surface.initialize()?;
        let gutter_width = self.options.gutter_width;
        if height == 0 || width < gutter_width.saturating_add(MIN_BODY_WIDTH) {
            return Err(AppError::TerminalTooSmall { width, height });
        }
        let body_width = width - gutter_width;

        surface.create_gutter(gutter_width)?;
        surface.create_body(gutter_width, 0, height, body_width)?;
        for id in ColorId::ALL {
            let (foreground, background) = self.options.palette.colors(id);
            surface.set_color(id, foreground, background);
        }

        let last_page = self.store.visible_len().max(1);
        let top_line = AdjustedLine::new(self.options.page.min(last_page));
        self.view = ViewState::new(top_line, usize::from(height), usize::from(body_width));
        info!(
            height,
            width = body_width,
            top_line = %self.view.top_line,
            "Rendering static view"
        );

        draw_view(&self.store, &self.view, surface)?;
        surface.refresh()?;
        Ok(())
    }
}
