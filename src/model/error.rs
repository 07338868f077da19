//! Error types for typeshow.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from the session and `main`
//!   - [`ConfigError`] - Config file unreadable or invalid
//!   - [`LoggingError`] - Log file could not be opened
//!   - [`InputError`] - Presented file missing or unreadable
//!   - [`AreaError`] - Bad `--areas` value or regions that do not fit the file
//!   - [`SurfaceError`] - Terminal failures while rendering or waiting for keys
//!
//! Configuration and input errors are raised before the terminal is touched, so
//! their messages land on a normal console. Everything after that is a runtime
//! error: logged, followed by terminal shutdown, then reported on stderr.

use super::span::LineSpan;
use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::view::SurfaceError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// The presented file could not be read.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Region configuration is invalid.
    #[error("Invalid areas: {0}")]
    Area(#[from] AreaError),

    /// Terminal surface failure.
    #[error("Terminal error: {0}")]
    Surface(#[from] SurfaceError),

    /// Installing the signal handler failed.
    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    /// Terminal has no room for the gutter and at least one body column.
    #[error("Terminal too small: {width}x{height}")]
    TerminalTooSmall {
        /// Terminal width in columns.
        width: u16,
        /// Terminal height in rows.
        height: u16,
    },

    /// A line that should be typed could not be brought on screen.
    #[error("Line {line} is outside the viewport")]
    OffScreen {
        /// Adjusted line number that was off screen.
        line: usize,
    },

    /// A termination signal arrived.
    #[error("Interrupted")]
    Interrupted,
}

impl AppError {
    /// Whether this error came from a termination signal.
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self,
            AppError::Interrupted | AppError::Surface(SurfaceError::Interrupted)
        )
    }
}

/// Errors encountered when reading the presented file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Any other I/O failure (permissions, directories, disk errors).
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors in the region configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AreaError {
    /// Token is not `N` or `N-M` with integer bounds.
    #[error("Malformed area '{token}': expected N or N-M")]
    Malformed {
        /// Offending token.
        token: String,
    },

    /// Line numbers are 1-based.
    #[error("Area '{token}' refers to line 0; lines start at 1")]
    ZeroLine {
        /// Offending token.
        token: String,
    },

    /// Range end comes before its start.
    #[error("Area {start}-{end} ends before it starts")]
    Inverted {
        /// Start line as given.
        start: usize,
        /// End line as given.
        end: usize,
    },

    /// Two regions share at least one line.
    #[error("Areas {first} and {second} overlap")]
    Overlap {
        /// Earlier span.
        first: LineSpan,
        /// Later span.
        second: LineSpan,
    },

    /// Region reaches past the end of the file.
    #[error("Area {span} is outside the file ({line_count} lines)")]
    OutOfBounds {
        /// Offending span.
        span: LineSpan,
        /// Number of lines in the file.
        line_count: usize,
    },
}
