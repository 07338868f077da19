//! Internal test modules - whitebox tests with crate access
//!
//! Acceptance scenarios run a whole `Session` against `TuiSurface` on a
//! ratatui `TestBackend`, or against the call-recording surface when the
//! order of terminal calls is what matters.
