use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured clinical attributes that a source row may carry in addition to
/// its free-text question and answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathological_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_system: Option<String>,
}

impl ClinicalAttributes {
    /// Fills every attribute that is still absent from `other`.
    ///
    /// Values already present are kept, so folding the rows of a case in
    /// source order keeps the first value seen for each attribute.
    pub fn fill_missing_from(&mut self, other: &ClinicalAttributes) {
        fill(&mut self.procedure_type, &other.procedure_type);
        fill(&mut self.tumor_type, &other.tumor_type);
        if self.tumor_size.is_none() {
            self.tumor_size = other.tumor_size;
        }
        fill(&mut self.margin_status, &other.margin_status);
        fill(&mut self.clinical_stage, &other.clinical_stage);
        fill(&mut self.pathological_stage, &other.pathological_stage);
        fill(&mut self.staging_system, &other.staging_system);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn fill(slot: &mut Option<String>, candidate: &Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty)
        && let Some(value) = candidate.as_deref().filter(|v| !v.is_empty())
    {
        *slot = Some(value.to_string());
    }
}

/// One question/answer pair of a pathology case, as read from the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub case_number: String,
    pub report_loinc_code: String,
    pub report_loinc_name: String,
    pub protocol_name: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub clinical: ClinicalAttributes,
}

impl ResultRow {
    /// The `"{question}: {answer}"` line this row contributes to its report.
    pub fn text(&self) -> String {
        format!("{}: {}", self.question, self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_keeps_first_value() {
        let mut first = ClinicalAttributes {
            tumor_type: Some("Adenocarcinoma".to_string()),
            ..ClinicalAttributes::default()
        };
        let second = ClinicalAttributes {
            tumor_type: Some("Squamous".to_string()),
            margin_status: Some("Negative".to_string()),
            tumor_size: Some(2.5),
            ..ClinicalAttributes::default()
        };
        first.fill_missing_from(&second);
        assert_eq!(first.tumor_type.as_deref(), Some("Adenocarcinoma"));
        assert_eq!(first.margin_status.as_deref(), Some("Negative"));
        assert_eq!(first.tumor_size, Some(2.5));
    }

    #[test]
    fn fill_replaces_empty_string() {
        let mut first = ClinicalAttributes {
            clinical_stage: Some(String::new()),
            ..ClinicalAttributes::default()
        };
        let second = ClinicalAttributes {
            clinical_stage: Some("IIA".to_string()),
            ..ClinicalAttributes::default()
        };
        first.fill_missing_from(&second);
        assert_eq!(first.clinical_stage.as_deref(), Some("IIA"));
    }

    #[test]
    fn fill_skips_empty_candidate() {
        let mut first = ClinicalAttributes::default();
        let second = ClinicalAttributes {
            staging_system: Some(String::new()),
            ..ClinicalAttributes::default()
        };
        first.fill_missing_from(&second);
        assert_eq!(first.staging_system, None);
    }
}
