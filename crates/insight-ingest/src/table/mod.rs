//! Results table reading.

mod columns;
mod reader;

pub use columns::{REQUIRED_COLUMNS, check_required_columns, normalize_header};
pub use reader::{load_result_rows, parse_date, read_result_rows};
