//! Error types for report queries and analytics.

use insight_ingest::IngestError;
use thiserror::Error;

/// Errors surfaced by the query and analytics operations.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Loading the source table failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A caller-supplied parameter violates a precondition.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A pagination cursor does not decode to a non-negative offset.
    #[error("malformed cursor '{cursor}'")]
    MalformedCursor { cursor: String },
}

impl InsightError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for query and analytics operations.
pub type Result<T> = std::result::Result<T, InsightError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ingest_error_is_transparent() {
        let err: InsightError = IngestError::FileNotFound {
            path: PathBuf::from("results.csv"),
        }
        .into();
        assert_eq!(err.to_string(), "CSV file not found: results.csv");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = InsightError::invalid_argument("start_date", "start date must not be after end date");
        assert_eq!(
            err.to_string(),
            "invalid argument 'start_date': start date must not be after end date"
        );
    }
}
