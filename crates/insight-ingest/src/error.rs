//! Error types for result-row ingestion.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the source table.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record is missing a required field or holds an unparsable value.
    ///
    /// `line` is the 1-based line in the source file, when known.
    #[error("malformed record in {path} at line {}: {reason}", display_line(.line))]
    MalformedRecord {
        path: PathBuf,
        line: Option<u64>,
        reason: String,
    },
}

fn display_line(line: &Option<u64>) -> String {
    line.map_or_else(|| "?".to_string(), |l| l.to_string())
}

impl IngestError {
    pub(crate) fn malformed(path: &Path, line: Option<u64>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    /// True for the "source missing" class of failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
