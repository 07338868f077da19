//! typeshow
//!
//! Shows a source file in the terminal and types selected line ranges into it
//! character by character, scrolling so the typing stays on screen.
//!
//! Pure core (`model`, `view_state`) / impure shell (`session`, `view`)
//! architecture: the core never touches the terminal, the shell only talks
//! to it through `view::TerminalSurface`.

pub mod config;
pub mod interrupt;
pub mod logging;
pub mod model;
pub mod session;
pub mod source;
pub mod view;
pub mod view_state;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
