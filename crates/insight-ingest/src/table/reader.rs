//! Result-row loading with serde deserialization.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use insight_model::{ClinicalAttributes, ResultRow};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

use super::columns::{check_required_columns, normalize_header};

/// Accepted layouts for the `Date` column, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// CSV row structure for the results table.
#[derive(Debug, Deserialize)]
struct CsvResultRow {
    #[serde(rename = "CaseNumber")]
    case_number: String,
    #[serde(rename = "ReportLoincCode")]
    report_loinc_code: String,
    #[serde(rename = "ReportLoincName")]
    report_loinc_name: String,
    #[serde(rename = "Protocol Name")]
    protocol_name: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Answer")]
    answer: String,
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Procedure Type", default)]
    procedure_type: Option<String>,
    #[serde(rename = "Tumor Type", default)]
    tumor_type: Option<String>,
    #[serde(rename = "Tumor Size", default)]
    tumor_size: Option<String>,
    #[serde(rename = "Margin Status", default)]
    margin_status: Option<String>,
    #[serde(rename = "Clinical Stage", default)]
    clinical_stage: Option<String>,
    #[serde(rename = "Pathological Stage", default)]
    pathological_stage: Option<String>,
    #[serde(rename = "Staging System", default)]
    staging_system: Option<String>,
}

impl CsvResultRow {
    fn into_row(self, path: &Path, line: Option<u64>) -> Result<ResultRow> {
        if self.case_number.trim().is_empty() {
            return Err(IngestError::malformed(path, line, "empty CaseNumber"));
        }

        let date = match present(self.date) {
            Some(raw) => Some(parse_date(&raw).ok_or_else(|| {
                IngestError::malformed(path, line, format!("invalid Date value '{raw}'"))
            })?),
            None => None,
        };

        let tumor_size = match present(self.tumor_size) {
            Some(raw) => Some(raw.trim().parse::<f64>().map_err(|_| {
                IngestError::malformed(path, line, format!("invalid Tumor Size value '{raw}'"))
            })?),
            None => None,
        };

        Ok(ResultRow {
            case_number: self.case_number,
            report_loinc_code: self.report_loinc_code,
            report_loinc_name: self.report_loinc_name,
            protocol_name: self.protocol_name,
            question: self.question,
            answer: self.answer,
            date,
            clinical: ClinicalAttributes {
                procedure_type: present(self.procedure_type),
                tumor_type: present(self.tumor_type),
                tumor_size,
                margin_status: present(self.margin_status),
                clinical_stage: present(self.clinical_stage),
                pathological_stage: present(self.pathological_stage),
                staging_system: present(self.staging_system),
            },
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a `Date` cell, keeping only the calendar date of date-time values.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.date())
        })
}

/// Load result rows from a CSV file, preserving source order.
///
/// # Errors
///
/// - [`IngestError::FileNotFound`] if `path` does not exist.
/// - [`IngestError::FileRead`] for other I/O failures.
/// - [`IngestError::MalformedRecord`] if a required column is missing, a
///   record cannot be decoded, or a value fails to parse. The whole load
///   fails; no rows are returned.
pub fn load_result_rows(path: &Path) -> Result<Vec<ResultRow>> {
    debug!(path = %path.display(), "loading result rows");
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let rows = read_result_rows(BufReader::new(file), path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded result rows");
    Ok(rows)
}

/// Read result rows from any reader. `path` only labels errors.
pub fn read_result_rows<R: Read>(source: R, path: &Path) -> Result<Vec<ResultRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let headers: csv::StringRecord = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(normalize_header)
        .collect();
    check_required_columns(&headers, path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(csv::Position::line);
        let raw: CsvResultRow = record
            .deserialize(Some(&headers))
            .map_err(|e| IngestError::malformed(path, line, e.to_string()))?;
        rows.push(raw.into_row(path, line)?);
    }
    Ok(rows)
}

fn csv_error(path: &Path, err: csv::Error) -> IngestError {
    let line = err.position().map(csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        _ => IngestError::malformed(path, line, message),
    }
}
