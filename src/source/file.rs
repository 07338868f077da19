//! File-based source for the presented text.

use crate::model::error::InputError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// The presented file, read once at startup.
///
/// Line separators (`\n` or `\r\n`) are stripped. Invalid UTF-8 is replaced
/// rather than rejected so any text-ish file can be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    lines: Vec<String>,
}

impl FileSource {
    /// Read `path` fully into memory.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist and
    /// `InputError::Io` for any other read failure.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                InputError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                InputError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let lines: Vec<String> = String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect();

        info!(path = %path.display(), lines = lines.len(), "Loaded file");

        Ok(Self { lines })
    }

    /// Lines without separators, in file order.
    #[cfg(test)]
    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume into the lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
