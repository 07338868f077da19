//! Domain model types (pure).

pub mod error;
pub mod key_action;
pub mod line;
pub mod span;

pub use error::{AppError, AreaError, InputError};
pub use key_action::KeyAction;
pub use line::{Line, LineStyle};
pub use span::{parse_area_list, AreaList, LineSpan};
