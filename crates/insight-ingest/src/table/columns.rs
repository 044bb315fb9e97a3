//! Source table column names and header validation.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Columns every result table must carry. The row struct in `reader.rs`
/// decodes these names.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "CaseNumber",
    "ReportLoincCode",
    "ReportLoincName",
    "Protocol Name",
    "Question",
    "Answer",
];

/// Normalizes a header value by trimming whitespace and a stray BOM.
pub fn normalize_header(value: &str) -> String {
    value.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Fails with [`IngestError::MalformedRecord`] naming the first required
/// column absent from `headers`.
pub fn check_required_columns(headers: &csv::StringRecord, path: &Path) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IngestError::malformed(
                path,
                Some(1),
                format!("missing required column '{column}'"),
            ));
        }
    }
    Ok(())
}
