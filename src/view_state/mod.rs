//! View-state layer: the pure core of the presenter.
//!
//! Nothing in here touches the terminal.
//!
//! # Module Structure
//!
//! - `types`: line-number newtypes and `ViewState`
//! - `line_store`: every file line, tagged revealed or pending
//! - `regions`: the ranges that start hidden, and the pending-line arithmetic
//! - `coords`: original line -> adjusted line -> viewport row
//! - `scroll`: how far to scroll so a block of lines is visible

pub mod coords;
pub mod line_store;
pub mod regions;
pub mod scroll;
pub mod types;

pub use line_store::LineStore;
pub use regions::{current_adjust_for, Region, RegionId, RegionSet};
pub use types::{AdjustedLine, OriginalLine, ViewState};
