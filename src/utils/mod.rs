pub mod error;
pub mod logging;
pub mod string_utils;

pub use error::*;
pub use string_utils::{single_line_summary, truncate_safe, MAX_ERROR_DETAIL_BYTES};
