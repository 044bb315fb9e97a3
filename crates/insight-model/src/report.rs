use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::row::ClinicalAttributes;
use crate::text::{eq_ignore_case, non_empty};

/// Margin status value that counts as an adequate resection.
pub const NEGATIVE_MARGIN: &str = "negative";

/// All rows of one case, aggregated into a single report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub case_number: String,
    pub report_loinc_code: String,
    pub report_loinc_name: String,
    pub protocol_name: String,
    pub report_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub clinical: ClinicalAttributes,
}

impl Report {
    /// True when the margin status reads "negative", in any case.
    pub fn has_negative_margin(&self) -> bool {
        self.clinical
            .margin_status
            .as_deref()
            .is_some_and(|status| eq_ignore_case(status, NEGATIVE_MARGIN))
    }

    /// Clinical and pathological stage, when both are recorded.
    pub fn stage_pair(&self) -> Option<(&str, &str)> {
        let clinical = non_empty(self.clinical.clinical_stage.as_deref())?;
        let pathological = non_empty(self.clinical.pathological_stage.as_deref())?;
        Some((clinical, pathological))
    }

    /// True when both stages are recorded and identical.
    pub fn is_stage_concordant(&self) -> bool {
        self.stage_pair().is_some_and(|(c, p)| c == p)
    }

    pub fn tumor_type(&self) -> Option<&str> {
        non_empty(self.clinical.tumor_type.as_deref())
    }

    /// Tumor size with missing values counted as zero, as the averages expect.
    pub fn tumor_size_or_zero(&self) -> f64 {
        self.clinical.tumor_size.unwrap_or(0.0)
    }
}
