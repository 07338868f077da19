//! The host terminal: mode switching, key input and the bell.
//!
//! Split from the surface so the drawing model can run on ratatui's
//! `TestBackend` with scripted input.

use crate::interrupt::InterruptFlag;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, ExecutableCommand};
use std::io::{self, Write};
use std::time::Duration;

/// Something the presenter can wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal changed size.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// A termination signal arrived while waiting.
    Interrupted,
}

/// Terminal mode, input and bell.
pub trait Console {
    /// Switch the terminal into presentation mode.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn enter(&mut self) -> io::Result<()>;

    /// Restore the terminal to how it was before `enter`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn leave(&mut self) -> io::Result<()>;

    /// Block until the next key press, resize or interrupt.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn next_event(&mut self) -> io::Result<ConsoleEvent>;

    /// Ring the terminal bell.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn bell(&mut self) -> io::Result<()>;
}

/// The real terminal on stdout, driven by crossterm.
#[derive(Debug, Default)]
pub struct CrosstermConsole {
    interrupt: InterruptFlag,
    entered: bool,
}

impl CrosstermConsole {
    /// How often a blocked key wait checks the interrupt flag.
    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Console that gives up waiting once `interrupt` is set.
    pub fn new(interrupt: InterruptFlag) -> Self {
        Self {
            interrupt,
            entered: false,
        }
    }
}

impl Console for CrosstermConsole {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.entered = true;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(cursor::Hide)?;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        let mut stdout = io::stdout();
        stdout.execute(cursor::Show)?;
        stdout.execute(LeaveAlternateScreen)?;
        disable_raw_mode()
    }

    fn next_event(&mut self) -> io::Result<ConsoleEvent> {
        loop {
            if self.interrupt.is_set() {
                return Ok(ConsoleEvent::Interrupted);
            }
            if !event::poll(Self::POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(ConsoleEvent::Key(key));
                }
                Event::Resize(width, height) => {
                    return Ok(ConsoleEvent::Resize { width, height });
                }
                _ => {}
            }
        }
    }

    fn bell(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()
    }
}
