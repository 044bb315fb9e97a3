//! Tests for insight-model types.

use chrono::NaiveDate;
use insight_model::{
    ClinicalAttributes, DiscordancePattern, FieldStatistics, MarginAnalysisResponse,
    PagedResult, Report, ResultRow,
};

fn report(case_number: &str) -> Report {
    Report {
        case_number: case_number.to_string(),
        report_loinc_code: "60568-3".to_string(),
        report_loinc_name: "Lung Cancer Synoptic Report".to_string(),
        protocol_name: "Lung Cancer Protocol".to_string(),
        report_text: "Tumor Size: 3.5 cm".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1),
        clinical: ClinicalAttributes::default(),
    }
}

#[test]
fn paged_result_serializes_camel_case() {
    let page = PagedResult {
        items: vec![report("CASE001")],
        next_cursor: Some("MQ==".to_string()),
        has_more: true,
        total_count: 3,
    };
    insta::assert_json_snapshot!(page, @r#"
    {
      "items": [
        {
          "caseNumber": "CASE001",
          "reportLoincCode": "60568-3",
          "reportLoincName": "Lung Cancer Synoptic Report",
          "protocolName": "Lung Cancer Protocol",
          "reportText": "Tumor Size: 3.5 cm",
          "date": "2024-01-01"
        }
      ],
      "nextCursor": "MQ==",
      "hasMore": true,
      "totalCount": 3
    }
    "#);
}

#[test]
fn last_page_omits_cursor() {
    let page: PagedResult<Report> = PagedResult {
        items: Vec::new(),
        next_cursor: None,
        has_more: false,
        total_count: 0,
    };
    let json = serde_json::to_value(&page).expect("serialize page");
    assert!(json.get("nextCursor").is_none());
    assert_eq!(json["hasMore"], false);
    assert_eq!(json["totalCount"], 0);
}

#[test]
fn report_flattens_clinical_attributes() {
    let mut with_clinical = report("CASE002");
    with_clinical.clinical.margin_status = Some("Negative".to_string());
    with_clinical.clinical.tumor_size = Some(2.5);
    let json = serde_json::to_value(&with_clinical).expect("serialize report");
    assert_eq!(json["marginStatus"], "Negative");
    assert_eq!(json["tumorSize"], 2.5);
    assert!(json.get("clinicalStage").is_none());
    assert!(json.get("clinical").is_none());
}

#[test]
fn report_round_trips_through_json() {
    let mut original = report("CASE003");
    original.clinical.clinical_stage = Some("IIA".to_string());
    let json = serde_json::to_string(&original).expect("serialize report");
    let round: Report = serde_json::from_str(&json).expect("deserialize report");
    assert_eq!(round, original);
}

#[test]
fn negative_margin_ignores_case() {
    let mut r = report("CASE004");
    assert!(!r.has_negative_margin());
    r.clinical.margin_status = Some("NEGATIVE".to_string());
    assert!(r.has_negative_margin());
    r.clinical.margin_status = Some("Positive".to_string());
    assert!(!r.has_negative_margin());
}

#[test]
fn stage_pair_requires_both_stages() {
    let mut r = report("CASE005");
    r.clinical.clinical_stage = Some("IIA".to_string());
    assert_eq!(r.stage_pair(), None);
    r.clinical.pathological_stage = Some(String::new());
    assert_eq!(r.stage_pair(), None);
    r.clinical.pathological_stage = Some("IIA".to_string());
    assert_eq!(r.stage_pair(), Some(("IIA", "IIA")));
    assert!(r.is_stage_concordant());
}

#[test]
fn row_text_joins_question_and_answer() {
    let row = ResultRow {
        case_number: "A".to_string(),
        report_loinc_code: String::new(),
        report_loinc_name: String::new(),
        protocol_name: String::new(),
        question: "Histologic Type".to_string(),
        answer: "Adenocarcinoma".to_string(),
        date: None,
        clinical: ClinicalAttributes::default(),
    };
    assert_eq!(row.text(), "Histologic Type: Adenocarcinoma");
}

#[test]
fn discordance_pattern_omits_missing_factors() {
    let pattern = DiscordancePattern {
        clinical_stage: "IIA".to_string(),
        pathological_stage: "IIIA".to_string(),
        frequency: 1,
        percentage: 0.5,
        common_factors: None,
    };
    insta::assert_json_snapshot!(pattern, @r#"
    {
      "clinicalStage": "IIA",
      "pathologicalStage": "IIIA",
      "frequency": 1,
      "percentage": 0.5
    }
    "#);
}

#[test]
fn empty_field_statistics_keep_name() {
    let stats = FieldStatistics::empty("Non-Existent Field");
    let json = serde_json::to_value(&stats).expect("serialize stats");
    assert_eq!(json["fieldName"], "Non-Existent Field");
    assert_eq!(json["values"], serde_json::json!([]));
}

#[test]
fn margin_response_omits_absent_benchmark() {
    let response = MarginAnalysisResponse {
        total_cases: 0,
        margin_adequacy_rate: 0.0,
        trending_data: vec![],
        tumor_correlations: vec![],
        benchmark_comparison: None,
    };
    let json = serde_json::to_value(&response).expect("serialize response");
    assert!(json.get("benchmarkComparison").is_none());
    assert_eq!(json["trendingData"], serde_json::json!([]));
}
