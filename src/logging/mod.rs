//! Tracing subscriber initialization.
//!
//! Logs are written to a file, never to the terminal the presentation is
//! drawn on. Users can monitor logs via `tail -f` in a separate terminal.
//!
//! Logging has an explicit lifecycle: [`init`] returns a [`LogGuard`] that
//! installs the subscriber for the current thread, and dropping the guard
//! closes it again.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::subscriber::DefaultGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// The log file could not be opened
    #[error("Failed to open log file {path:?}: {source}")]
    Appender {
        /// The log file path
        path: PathBuf,
        /// The underlying appender error
        #[source]
        source: InitError,
    },
}

/// Active logging session. Logging stops when this is dropped.
#[derive(Debug)]
#[must_use = "logging stops as soon as the guard is dropped"]
pub struct LogGuard {
    path: PathBuf,
    _default: DefaultGuard,
}

impl LogGuard {
    /// File the session is writing to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Initialize file-based logging for the current thread.
///
/// Respects RUST_LOG environment variable, defaults to "info" level.
/// Creates the log directory if it doesn't exist.
///
/// # Errors
///
/// Returns `LoggingError` if the directory cannot be created, the path has
/// no file name, or the file cannot be opened.
pub fn init(log_path: &Path) -> Result<LogGuard, LoggingError> {
    use tracing_subscriber::EnvFilter;

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    // A bare file name has an empty parent: log next to the working directory.
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|source| LoggingError::Appender {
            path: log_path.to_path_buf(),
            source,
        })?;

    // Respect RUST_LOG, default to "info"
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false) // No ANSI colors in log files
        .finish();

    Ok(LogGuard {
        path: log_path.to_path_buf(),
        _default: tracing::subscriber::set_default(subscriber),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("typeshow_test_logs_create");
        let log_file = test_dir.join("test.log");

        let _ = fs::remove_dir_all(&test_dir);

        let guard = init(&log_file).expect("logging should initialize");
        assert!(
            test_dir.exists(),
            "Log directory should be created: {:?}",
            test_dir
        );
        assert_eq!(guard.path(), log_file.as_path());

        drop(guard);
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn events_reach_the_file_while_guard_is_alive() {
        let test_dir = std::env::temp_dir().join("typeshow_test_logs_write");
        let log_file = test_dir.join("app.log");
        let _ = fs::remove_dir_all(&test_dir);

        let guard = init(&log_file).expect("logging should initialize");
        tracing::error!("typeshow-marker-while-alive");
        drop(guard);
        tracing::error!("typeshow-marker-after-drop");

        let contents = fs::read_to_string(&log_file).expect("log file should exist");
        assert!(contents.contains("typeshow-marker-while-alive"));
        assert!(
            !contents.contains("typeshow-marker-after-drop"),
            "nothing should be written once the guard is dropped"
        );

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_can_run_again_after_guard_is_dropped() {
        let test_dir = std::env::temp_dir().join("typeshow_test_logs_twice");
        let log_file = test_dir.join("again.log");
        let _ = fs::remove_dir_all(&test_dir);

        drop(init(&log_file).expect("first init"));
        drop(init(&log_file).expect("second init"));

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    fn init_rejects_path_without_file_name() {
        let result = init(Path::new("/"));
        assert!(matches!(result, Err(LoggingError::InvalidPath(_))));
    }
}
