//! Input source for the presented text.

pub mod file;

pub use file::FileSource;
