//! Terminal surface (impure shell).
//!
//! [`TerminalSurface`] is the only way the session touches the terminal.
//! [`TuiSurface`] implements it with a curses-like in-memory model of two
//! windows (line-number gutter and body) that ratatui paints on `refresh`.

pub mod console;
pub mod styles;

pub use console::{Console, ConsoleEvent, CrosstermConsole};
pub use styles::{ColorId, Palette, StyleTable};

use crate::config::KeyBindings;
use crate::model::KeyAction;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::io;
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

/// Columns between tab stops.
pub const TAB_WIDTH: u16 = 8;

/// Errors that can occur during terminal surface operations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// A window was used before `initialize` / `create_*`.
    #[error("Terminal surface used before initialization")]
    NotInitialized,

    /// A window does not fit in the terminal.
    #[error("Window {width}x{height} at ({x}, {y}) does not fit the terminal")]
    WindowOutOfBounds {
        /// Left column.
        x: u16,
        /// Top row.
        y: u16,
        /// Width in columns.
        width: u16,
        /// Height in rows.
        height: u16,
    },

    /// Cursor or gutter row outside its window.
    #[error("Position ({row}, {col}) is outside the window")]
    PositionOutOfRange {
        /// Row inside the window.
        row: u16,
        /// Column inside the window.
        col: u16,
    },

    /// The terminal was resized mid-presentation.
    #[error("Terminal resized to {width}x{height} during the presentation")]
    Resized {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// A termination signal arrived while waiting for a key.
    #[error("Interrupted while waiting for a key")]
    Interrupted,
}

/// Drawing and input capability the presenter core calls into.
///
/// Rows and columns are 0-based and relative to the window being addressed.
/// `shutdown` must be the last call.
pub trait TerminalSurface {
    /// Enter presentation mode; returns `(height, width)` of the terminal.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Io` if the terminal cannot be set up.
    fn initialize(&mut self) -> Result<(u16, u16), SurfaceError>;

    /// Create the line-number window at the left edge, full height.
    ///
    /// # Errors
    ///
    /// Returns an error if called before `initialize` or wider than the terminal.
    fn create_gutter(&mut self, width: u16) -> Result<(), SurfaceError>;

    /// Create the text window.
    ///
    /// # Errors
    ///
    /// Returns an error if called before `initialize` or the window does not fit.
    fn create_body(&mut self, x: u16, y: u16, height: u16, width: u16)
        -> Result<(), SurfaceError>;

    /// Register the colors drawn for `id`.
    fn set_color(&mut self, id: ColorId, foreground: Color, background: Color);

    /// Show `number` on gutter `row`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no gutter or `row` is outside it.
    fn write_gutter_line(&mut self, row: u16, number: usize) -> Result<(), SurfaceError>;

    /// Blank the body and home the cursor.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::NotInitialized` if there is no body.
    fn clear_body(&mut self) -> Result<(), SurfaceError>;

    /// Place the body cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the body.
    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), SurfaceError>;

    /// Insert a blank row at the cursor row; rows below shift down and the
    /// last one falls off. The cursor moves to column 0.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::NotInitialized` if there is no body.
    fn insert_line(&mut self) -> Result<(), SurfaceError>;

    /// Write `text` at the cursor in `color`, advancing the cursor.
    /// Text past the right edge is clipped.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::NotInitialized` if there is no body.
    fn write_char(&mut self, text: &str, color: ColorId) -> Result<(), SurfaceError>;

    /// Push everything written so far to the screen.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Io` if drawing fails.
    fn refresh(&mut self) -> Result<(), SurfaceError>;

    /// Block for the presenter's next key press.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Resized` or `SurfaceError::Interrupted` when the
    /// wait ends for a reason other than a key press.
    fn wait_key(&mut self) -> Result<KeyAction, SurfaceError>;

    /// Audible/visual completion signal.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Io` if the bell cannot be written.
    fn beep(&mut self) -> Result<(), SurfaceError>;

    /// Restore the terminal. Must be the last call.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Io` if the terminal cannot be restored.
    fn shutdown(&mut self) -> Result<(), SurfaceError>;
}

/// One body cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Blank,
    Glyph(char, ColorId),
    /// Right half of a double-width glyph.
    Continuation,
}

#[derive(Debug, Clone)]
struct Gutter {
    width: u16,
    rows: Vec<Option<usize>>,
}

#[derive(Debug, Clone)]
struct Body {
    area: Rect,
    rows: Vec<Vec<Cell>>,
    cursor_row: u16,
    cursor_col: u16,
}

impl Body {
    fn blank_row(&self) -> Vec<Cell> {
        vec![Cell::Blank; usize::from(self.area.width)]
    }

    fn put(&mut self, ch: char, color: ColorId) {
        if ch.is_control() {
            return;
        }
        let width = match ch.width() {
            Some(width) if width > 0 => width as u16,
            _ => return,
        };
        if self.cursor_col + width > self.area.width {
            self.cursor_col = self.area.width;
            return;
        }
        let row = &mut self.rows[usize::from(self.cursor_row)];
        let col = usize::from(self.cursor_col);
        row[col] = Cell::Glyph(ch, color);
        if width == 2 {
            row[col + 1] = Cell::Continuation;
        }
        self.cursor_col += width;
    }

    fn write(&mut self, text: &str, color: ColorId) {
        for ch in text.chars() {
            if ch == '\t' {
                let spaces = TAB_WIDTH - self.cursor_col % TAB_WIDTH;
                for _ in 0..spaces {
                    self.put(' ', color);
                }
            } else {
                self.put(ch, color);
            }
        }
    }

    fn row_text(&self, row: usize) -> Option<String> {
        self.rows.get(row).map(|cells| {
            cells
                .iter()
                .filter_map(|cell| match cell {
                    Cell::Blank => Some(' '),
                    Cell::Glyph(ch, _) => Some(*ch),
                    Cell::Continuation => None,
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
    }

    fn render_lines(&self, styles: &StyleTable) -> Vec<TextLine<'static>> {
        self.rows
            .iter()
            .map(|cells| {
                let mut spans: Vec<Span<'static>> = Vec::new();
                let mut run = String::new();
                let mut run_style: Option<Style> = None;
                for cell in cells {
                    let (ch, style) = match cell {
                        Cell::Blank => (' ', styles.get(ColorId::Background)),
                        Cell::Glyph(ch, color) => (*ch, styles.get(*color)),
                        Cell::Continuation => continue,
                    };
                    if run_style != Some(style) {
                        if let Some(previous) = run_style {
                            spans.push(Span::styled(std::mem::take(&mut run), previous));
                        }
                        run_style = Some(style);
                    }
                    run.push(ch);
                }
                if let Some(style) = run_style {
                    spans.push(Span::styled(run, style));
                }
                TextLine::from(spans)
            })
            .collect()
    }
}

/// ratatui-backed [`TerminalSurface`].
///
/// Generic over backend to support testing with `TestBackend`, and over the
/// console so key input can be scripted.
pub struct TuiSurface<B, C>
where
    B: Backend,
    C: Console,
{
    terminal: Terminal<B>,
    console: C,
    key_bindings: KeyBindings,
    styles: StyleTable,
    size: Option<(u16, u16)>,
    gutter: Option<Gutter>,
    body: Option<Body>,
    entered: bool,
}

impl<B, C> TuiSurface<B, C>
where
    B: Backend,
    C: Console,
{
    /// Wrap a ratatui backend. Nothing is written until `initialize`.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Io` if ratatui cannot query the backend.
    pub fn new(backend: B, console: C, key_bindings: KeyBindings) -> Result<Self, SurfaceError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            console,
            key_bindings,
            styles: StyleTable::default(),
            size: None,
            gutter: None,
            body: None,
            entered: false,
        })
    }

    /// The ratatui backend (e.g. to inspect a `TestBackend` buffer).
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// The console providing input.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Text currently in body `row`, trailing blanks trimmed.
    pub fn body_row_text(&self, row: usize) -> Option<String> {
        self.body.as_ref().and_then(|body| body.row_text(row))
    }

    /// Number shown on gutter `row`.
    pub fn gutter_number(&self, row: usize) -> Option<usize> {
        self.gutter
            .as_ref()
            .and_then(|gutter| gutter.rows.get(row).copied().flatten())
    }

    /// Body cursor as `(row, col)`.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.body
            .as_ref()
            .map(|body| (body.cursor_row, body.cursor_col))
    }

    fn body_mut(&mut self) -> Result<&mut Body, SurfaceError> {
        self.body.as_mut().ok_or(SurfaceError::NotInitialized)
    }

    fn gutter_lines(&self) -> Option<(Paragraph<'static>, Rect)> {
        let gutter = self.gutter.as_ref()?;
        let digits = usize::from(gutter.width.saturating_sub(1));
        let lines: Vec<TextLine<'static>> = gutter
            .rows
            .iter()
            .map(|number| match number {
                Some(number) => TextLine::from(format!("{number:>digits$} ")),
                None => TextLine::from(""),
            })
            .collect();
        let height = u16::try_from(gutter.rows.len()).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(lines).style(self.styles.get(ColorId::Background));
        Some((paragraph, Rect::new(0, 0, gutter.width, height)))
    }
}

impl<B, C> TerminalSurface for TuiSurface<B, C>
where
    B: Backend,
    C: Console,
{
    fn initialize(&mut self) -> Result<(u16, u16), SurfaceError> {
        self.console.enter()?;
        self.entered = true;
        let size = self.terminal.size()?;
        self.terminal.clear()?;
        self.size = Some((size.height, size.width));
        Ok((size.height, size.width))
    }

    fn create_gutter(&mut self, width: u16) -> Result<(), SurfaceError> {
        let (height, terminal_width) = self.size.ok_or(SurfaceError::NotInitialized)?;
        if width > terminal_width {
            return Err(SurfaceError::WindowOutOfBounds {
                x: 0,
                y: 0,
                width,
                height,
            });
        }
        self.gutter = Some(Gutter {
            width,
            rows: vec![None; usize::from(height)],
        });
        Ok(())
    }

    fn create_body(
        &mut self,
        x: u16,
        y: u16,
        height: u16,
        width: u16,
    ) -> Result<(), SurfaceError> {
        let (terminal_height, terminal_width) = self.size.ok_or(SurfaceError::NotInitialized)?;
        let fits = u32::from(x) + u32::from(width) <= u32::from(terminal_width)
            && u32::from(y) + u32::from(height) <= u32::from(terminal_height);
        if !fits {
            return Err(SurfaceError::WindowOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        self.body = Some(Body {
            area: Rect::new(x, y, width, height),
            rows: vec![vec![Cell::Blank; usize::from(width)]; usize::from(height)],
            cursor_row: 0,
            cursor_col: 0,
        });
        Ok(())
    }

    fn set_color(&mut self, id: ColorId, foreground: Color, background: Color) {
        self.styles.set(id, foreground, background);
    }

    fn write_gutter_line(&mut self, row: u16, number: usize) -> Result<(), SurfaceError> {
        let gutter = self.gutter.as_mut().ok_or(SurfaceError::NotInitialized)?;
        let slot = gutter
            .rows
            .get_mut(usize::from(row))
            .ok_or(SurfaceError::PositionOutOfRange { row, col: 0 })?;
        *slot = Some(number);
        Ok(())
    }

    fn clear_body(&mut self) -> Result<(), SurfaceError> {
        let body = self.body_mut()?;
        let blank = body.blank_row();
        for row in &mut body.rows {
            row.clone_from(&blank);
        }
        body.cursor_row = 0;
        body.cursor_col = 0;
        Ok(())
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), SurfaceError> {
        let body = self.body_mut()?;
        if row >= body.area.height || col > body.area.width {
            return Err(SurfaceError::PositionOutOfRange { row, col });
        }
        body.cursor_row = row;
        body.cursor_col = col;
        Ok(())
    }

    fn insert_line(&mut self) -> Result<(), SurfaceError> {
        let body = self.body_mut()?;
        let blank = body.blank_row();
        body.rows.insert(usize::from(body.cursor_row), blank);
        body.rows.truncate(usize::from(body.area.height));
        body.cursor_col = 0;
        Ok(())
    }

    fn write_char(&mut self, text: &str, color: ColorId) -> Result<(), SurfaceError> {
        self.body_mut()?.write(text, color);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), SurfaceError> {
        let gutter = self.gutter_lines();
        let body = self.body.as_ref().map(|body| {
            let paragraph = Paragraph::new(body.render_lines(&self.styles))
                .style(self.styles.get(ColorId::Background));
            (paragraph, body.area)
        });

        self.terminal.draw(|frame| {
            if let Some((paragraph, area)) = gutter {
                frame.render_widget(paragraph, area);
            }
            if let Some((paragraph, area)) = body {
                frame.render_widget(paragraph, area);
            }
        })?;
        Ok(())
    }

    fn wait_key(&mut self) -> Result<KeyAction, SurfaceError> {
        match self.console.next_event()? {
            ConsoleEvent::Key(key) => Ok(self.key_bindings.action_for(key)),
            ConsoleEvent::Resize { width, height } => Err(SurfaceError::Resized { width, height }),
            ConsoleEvent::Interrupted => Err(SurfaceError::Interrupted),
        }
    }

    fn beep(&mut self) -> Result<(), SurfaceError> {
        self.console.bell()?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), SurfaceError> {
        if self.entered {
            self.entered = false;
            self.console.leave()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{buffer_to_string, ScriptedConsole};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn surface(width: u16, height: u16) -> TuiSurface<TestBackend, ScriptedConsole> {
        TuiSurface::new(
            TestBackend::new(width, height),
            ScriptedConsole::default(),
            KeyBindings::default(),
        )
        .unwrap()
    }

    fn ready(width: u16, height: u16) -> TuiSurface<TestBackend, ScriptedConsole> {
        let mut surface = surface(width, height);
        surface.initialize().unwrap();
        surface.create_gutter(4).unwrap();
        surface.create_body(4, 0, height, width - 4).unwrap();
        surface
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let err: SurfaceError = io_err.into();
        assert!(matches!(err, SurfaceError::Io(_)));
    }

    #[test]
    fn initialize_reports_height_then_width_and_enters_console() {
        let mut surface = surface(40, 12);
        assert_eq!(surface.initialize().unwrap(), (12, 40));
        assert_eq!(surface.console().enter_count(), 1);
    }

    #[test]
    fn windows_require_initialize() {
        let mut surface = surface(40, 12);
        assert!(matches!(
            surface.create_gutter(4),
            Err(SurfaceError::NotInitialized)
        ));
        assert!(matches!(
            surface.write_char("x", ColorId::Normal),
            Err(SurfaceError::NotInitialized)
        ));
    }

    #[test]
    fn body_must_fit_terminal() {
        let mut surface = surface(40, 12);
        surface.initialize().unwrap();
        assert!(matches!(
            surface.create_body(4, 0, 12, 40),
            Err(SurfaceError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn write_char_advances_cursor() {
        let mut surface = ready(40, 5);
        surface.move_cursor(1, 0).unwrap();
        surface.write_char("ab", ColorId::Normal).unwrap();
        surface.write_char("c", ColorId::Highlight).unwrap();

        assert_eq!(surface.body_row_text(1).as_deref(), Some("abc"));
        assert_eq!(surface.cursor(), Some((1, 3)));
    }

    #[test]
    fn tabs_expand_to_next_stop() {
        let mut surface = ready(40, 5);
        surface.write_char("a\tb", ColorId::Normal).unwrap();
        assert_eq!(surface.body_row_text(0).as_deref(), Some("a       b"));
    }

    #[test]
    fn text_past_right_edge_is_clipped() {
        let mut surface = ready(10, 3);
        surface.write_char("abcdefghij", ColorId::Normal).unwrap();
        assert_eq!(surface.body_row_text(0).as_deref(), Some("abcdef"));
        assert_eq!(surface.cursor(), Some((0, 6)));
    }

    #[test]
    fn wide_characters_take_two_columns() {
        let mut surface = ready(20, 3);
        surface.write_char("日本", ColorId::Normal).unwrap();
        assert_eq!(surface.cursor(), Some((0, 4)));
        assert_eq!(surface.body_row_text(0).as_deref(), Some("日本"));
    }

    #[test]
    fn insert_line_shifts_rows_down_and_drops_last() {
        let mut surface = ready(20, 3);
        for (row, text) in ["one", "two", "three"].iter().enumerate() {
            surface.move_cursor(row as u16, 0).unwrap();
            surface.write_char(text, ColorId::Normal).unwrap();
        }

        surface.move_cursor(1, 5).unwrap();
        surface.insert_line().unwrap();
        surface.write_char("new", ColorId::Highlight).unwrap();

        assert_eq!(surface.body_row_text(0).as_deref(), Some("one"));
        assert_eq!(surface.body_row_text(1).as_deref(), Some("new"));
        assert_eq!(surface.body_row_text(2).as_deref(), Some("two"));
    }

    #[test]
    fn clear_body_blanks_rows_and_homes_cursor() {
        let mut surface = ready(20, 3);
        surface.move_cursor(2, 0).unwrap();
        surface.write_char("gone", ColorId::Normal).unwrap();

        surface.clear_body().unwrap();

        assert_eq!(surface.body_row_text(2).as_deref(), Some(""));
        assert_eq!(surface.cursor(), Some((0, 0)));
    }

    #[test]
    fn move_cursor_outside_body_fails() {
        let mut surface = ready(20, 3);
        assert!(matches!(
            surface.move_cursor(3, 0),
            Err(SurfaceError::PositionOutOfRange { row: 3, col: 0 })
        ));
    }

    #[test]
    fn refresh_paints_gutter_and_body() {
        let mut surface = ready(20, 3);
        for row in 0..3u16 {
            surface.write_gutter_line(row, usize::from(row) + 9).unwrap();
        }
        surface.move_cursor(0, 0).unwrap();
        surface.write_char("let x = 1;", ColorId::Normal).unwrap();
        surface.refresh().unwrap();

        let screen = buffer_to_string(surface.backend().buffer());
        assert_eq!(screen, "  9 let x = 1;\n 10\n 11");
    }

    #[test]
    fn refresh_applies_registered_colors() {
        let mut surface = ready(20, 2);
        surface.set_color(ColorId::Highlight, Color::Black, Color::Cyan);
        surface.write_char("x", ColorId::Highlight).unwrap();
        surface.refresh().unwrap();

        let cell = &surface.backend().buffer()[(4, 0)];
        assert_eq!(cell.symbol(), "x");
        assert_eq!(cell.bg, Color::Cyan);
    }

    #[test]
    fn write_gutter_line_outside_gutter_fails() {
        let mut surface = ready(20, 3);
        assert!(matches!(
            surface.write_gutter_line(3, 1),
            Err(SurfaceError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn wait_key_maps_bindings() {
        let mut surface = surface(20, 3);
        surface.console.push_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        surface.console.push_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));

        assert_eq!(surface.wait_key().unwrap(), KeyAction::Advance);
        assert_eq!(surface.wait_key().unwrap(), KeyAction::Quit);
    }

    #[test]
    fn wait_key_reports_resize() {
        let mut surface = surface(20, 3);
        surface.console.push(ConsoleEvent::Resize {
            width: 10,
            height: 5,
        });
        assert!(matches!(
            surface.wait_key(),
            Err(SurfaceError::Resized {
                width: 10,
                height: 5
            })
        ));
    }

    #[test]
    fn beep_rings_console_bell() {
        let mut surface = surface(20, 3);
        surface.beep().unwrap();
        assert_eq!(surface.console().bell_count(), 1);
    }

    #[test]
    fn shutdown_leaves_console_once() {
        let mut surface = surface(20, 3);
        surface.initialize().unwrap();
        surface.shutdown().unwrap();
        surface.shutdown().unwrap();
        assert_eq!(surface.console().leave_count(), 1);
    }
}
