//! Pathology result ingestion.
//!
//! Reads the flat results table (one question/answer pair per row) into
//! ordered [`ResultRow`](insight_model::ResultRow) records.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use insight_ingest::load_result_rows;
//!
//! let rows = load_result_rows(Path::new("Data/results.csv"))?;
//! ```

mod error;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Table Reading ===
pub use table::{
    REQUIRED_COLUMNS, check_required_columns, load_result_rows, normalize_header, parse_date,
    read_result_rows,
};
