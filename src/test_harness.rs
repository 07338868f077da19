//! Test doubles for the terminal.
//!
//! - [`RecordingSurface`]: a `TerminalSurface` that records every call and
//!   replays scripted key actions. For checking what the core asks for.
//! - [`ScriptedConsole`]: a `Console` for `TuiSurface<TestBackend, _>`. For
//!   checking what actually ends up on screen.

use crate::config::KeyBindings;
use crate::model::KeyAction;
use crate::view::{ColorId, Console, ConsoleEvent, SurfaceError, TerminalSurface, TuiSurface};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::style::Color;
use std::collections::VecDeque;
use std::io;

/// Convert a ratatui buffer to a string representation for assertions.
///
/// Captures the visual output character by character, preserving layout.
/// Empty lines are removed to keep expectations short.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Space bar: advances at every gate.
pub fn advance_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)
}

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Initialize,
    CreateGutter(u16),
    CreateBody(u16, u16, u16, u16),
    SetColor(ColorId),
    WriteGutterLine(u16, usize),
    ClearBody,
    MoveCursor(u16, u16),
    InsertLine,
    WriteChar(String, ColorId),
    Refresh,
    WaitKey,
    Beep,
    Shutdown,
}

/// Surface that records calls instead of drawing.
///
/// Key waits answer from a script and fall back to `Advance`.
#[derive(Debug)]
pub struct RecordingSurface {
    height: u16,
    width: u16,
    calls: Vec<SurfaceCall>,
    script: VecDeque<Result<KeyAction, SurfaceError>>,
    panic_on_insert: bool,
}

impl RecordingSurface {
    pub fn new(height: u16, width: u16) -> Self {
        Self {
            height,
            width,
            calls: Vec::new(),
            script: VecDeque::new(),
            panic_on_insert: false,
        }
    }

    /// Queue the answer to the next unanswered key wait.
    pub fn push_action(&mut self, action: KeyAction) {
        self.script.push_back(Ok(action));
    }

    /// Make the next unanswered key wait fail.
    pub fn push_error(&mut self, error: SurfaceError) {
        self.script.push_back(Err(error));
    }

    /// Panic inside the next `insert_line`.
    pub fn panic_on_insert(&mut self) {
        self.panic_on_insert = true;
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Number written on gutter row 0 by each redraw, in order.
    pub fn gutter_tops(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::WriteGutterLine(0, number) => Some(*number),
                _ => None,
            })
            .collect()
    }

    /// Everything written in Highlight, concatenated.
    pub fn typed_text(&self) -> String {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::WriteChar(text, ColorId::Highlight) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TerminalSurface for RecordingSurface {
    fn initialize(&mut self) -> Result<(u16, u16), SurfaceError> {
        self.calls.push(SurfaceCall::Initialize);
        Ok((self.height, self.width))
    }

    fn create_gutter(&mut self, width: u16) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::CreateGutter(width));
        Ok(())
    }

    fn create_body(
        &mut self,
        x: u16,
        y: u16,
        height: u16,
        width: u16,
    ) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::CreateBody(x, y, height, width));
        Ok(())
    }

    fn set_color(&mut self, id: ColorId, _foreground: Color, _background: Color) {
        self.calls.push(SurfaceCall::SetColor(id));
    }

    fn write_gutter_line(&mut self, row: u16, number: usize) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::WriteGutterLine(row, number));
        Ok(())
    }

    fn clear_body(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::ClearBody);
        Ok(())
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::MoveCursor(row, col));
        Ok(())
    }

    fn insert_line(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::InsertLine);
        if self.panic_on_insert {
            panic!("insert_line failed on purpose");
        }
        Ok(())
    }

    fn write_char(&mut self, text: &str, color: ColorId) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::WriteChar(text.to_string(), color));
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::Refresh);
        Ok(())
    }

    fn wait_key(&mut self) -> Result<KeyAction, SurfaceError> {
        self.calls.push(SurfaceCall::WaitKey);
        self.script.pop_front().unwrap_or(Ok(KeyAction::Advance))
    }

    fn beep(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::Beep);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), SurfaceError> {
        self.calls.push(SurfaceCall::Shutdown);
        Ok(())
    }
}

/// Console with scripted input. Once the script runs out every wait is
/// answered with the space bar.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    events: VecDeque<ConsoleEvent>,
    entered: usize,
    left: usize,
    bells: usize,
}

impl ScriptedConsole {
    pub fn push(&mut self, event: ConsoleEvent) {
        self.events.push_back(event);
    }

    pub fn push_key(&mut self, key: KeyEvent) {
        self.push(ConsoleEvent::Key(key));
    }

    pub fn enter_count(&self) -> usize {
        self.entered
    }

    pub fn leave_count(&self) -> usize {
        self.left
    }

    pub fn bell_count(&self) -> usize {
        self.bells
    }
}

impl Console for ScriptedConsole {
    fn enter(&mut self) -> io::Result<()> {
        self.entered += 1;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        self.left += 1;
        Ok(())
    }

    fn next_event(&mut self) -> io::Result<ConsoleEvent> {
        Ok(self
            .events
            .pop_front()
            .unwrap_or(ConsoleEvent::Key(advance_key())))
    }

    fn bell(&mut self) -> io::Result<()> {
        self.bells += 1;
        Ok(())
    }
}

/// A `TuiSurface` drawing into a `width` x `height` `TestBackend`.
pub fn test_surface(
    width: u16,
    height: u16,
    console: ScriptedConsole,
) -> TuiSurface<TestBackend, ScriptedConsole> {
    TuiSurface::new(TestBackend::new(width, height), console, KeyBindings::default())
        .expect("TestBackend never fails")
}
