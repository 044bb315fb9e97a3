//! Multi-criteria protocol search.

use std::collections::{BTreeSet, HashMap};

use insight_model::text::contains_ignore_case;
use insight_model::{PagedResult, Report};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{InsightError, Result};
use crate::pagination::paginate;

/// Earliest year a protocol search accepts.
pub const MIN_PROTOCOL_YEAR: i32 = 1900;
/// Latest year a protocol search accepts.
pub const MAX_PROTOCOL_YEAR: i32 = 2100;

/// Protocol name filters. Blank text criteria are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolCriteria {
    /// Case-insensitive substring of the protocol name.
    pub organ_system: Option<String>,
    /// Four-digit year appearing as a whole word.
    pub year: Option<i32>,
    /// Version label, with or without a leading `v`.
    pub version: Option<String>,
}

impl ProtocolCriteria {
    pub fn organ_system(mut self, organ_system: impl Into<String>) -> Self {
        self.organ_system = Some(organ_system.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Distinct protocol names in ordinal order.
pub fn distinct_protocol_names(reports: &[Report]) -> Vec<String> {
    reports
        .iter()
        .map(|r| r.protocol_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Keeps the names that satisfy every provided criterion.
///
/// # Errors
///
/// [`InsightError::InvalidArgument`] for a year outside
/// `MIN_PROTOCOL_YEAR..=MAX_PROTOCOL_YEAR`.
pub fn filter_protocol_names<'a, I>(names: I, criteria: &ProtocolCriteria) -> Result<Vec<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let matcher = ProtocolMatcher::new(criteria)?;
    Ok(names.into_iter().filter(|name| matcher.matches(name)).collect())
}

/// Searches protocols and returns one page of the reports filed under them.
///
/// Reports are ordered by protocol name first, then in load order.
///
/// # Errors
///
/// - [`InsightError::InvalidArgument`] for an out-of-range year or a zero
///   page size.
/// - [`InsightError::MalformedCursor`] if `cursor` does not decode.
pub fn search_protocols(
    reports: &[Report],
    criteria: &ProtocolCriteria,
    page_size: usize,
    cursor: Option<&str>,
) -> Result<PagedResult<Report>> {
    let names = distinct_protocol_names(reports);
    let matched = filter_protocol_names(names.iter().map(String::as_str), criteria)?;
    debug!(
        protocols = names.len(),
        matched = matched.len(),
        "filtered protocol names"
    );

    let mut by_protocol: HashMap<&str, Vec<&Report>> = HashMap::new();
    for report in reports {
        by_protocol
            .entry(report.protocol_name.as_str())
            .or_default()
            .push(report);
    }
    let selected = matched
        .iter()
        .filter_map(|name| by_protocol.get(name))
        .flatten()
        .map(|report| (*report).clone());

    paginate(selected, page_size, cursor)
}

struct ProtocolMatcher<'c> {
    organ_system: Option<&'c str>,
    year: Option<Regex>,
    version: Option<Regex>,
}

impl<'c> ProtocolMatcher<'c> {
    fn new(criteria: &'c ProtocolCriteria) -> Result<Self> {
        let year = criteria.year.map(year_pattern).transpose()?;
        let version = not_blank(criteria.version.as_deref())
            .map(version_pattern)
            .transpose()?;
        Ok(Self {
            organ_system: not_blank(criteria.organ_system.as_deref()),
            year,
            version,
        })
    }

    fn matches(&self, name: &str) -> bool {
        self.organ_system
            .is_none_or(|organ| contains_ignore_case(name, organ))
            && self.year.as_ref().is_none_or(|re| re.is_match(name))
            && self.version.as_ref().is_none_or(|re| re.is_match(name))
    }
}

fn not_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn year_pattern(year: i32) -> Result<Regex> {
    if !(MIN_PROTOCOL_YEAR..=MAX_PROTOCOL_YEAR).contains(&year) {
        return Err(InsightError::invalid_argument(
            "year",
            format!("year must be between {MIN_PROTOCOL_YEAR} and {MAX_PROTOCOL_YEAR}, got {year}"),
        ));
    }
    build_pattern("year", &format!(r"\b{year}\b"), false)
}

fn version_pattern(version: &str) -> Result<Regex> {
    let version = version.trim();
    let escaped = regex::escape(version);
    let pattern = if version.starts_with(['v', 'V']) {
        format!(r"\b{escaped}\b")
    } else {
        format!(r"\bv?{escaped}\b")
    };
    build_pattern("version", &pattern, true)
}

fn build_pattern(name: &'static str, pattern: &str, case_insensitive: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| InsightError::invalid_argument(name, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_model::ClinicalAttributes;

    const PROTOCOLS: [&str; 4] = [
        "Breast Invasive v1.0 2023",
        "Lung Respiratory V2.0 2022",
        "Respiratory Tract 1.0 2023",
        "Colon Resection v3.1 2020",
    ];

    fn report(case: &str, protocol: &str) -> Report {
        Report {
            case_number: case.to_string(),
            report_loinc_code: String::new(),
            report_loinc_name: String::new(),
            protocol_name: protocol.to_string(),
            report_text: String::new(),
            date: None,
            clinical: ClinicalAttributes::default(),
        }
    }

    fn filter(criteria: &ProtocolCriteria) -> Vec<&'static str> {
        filter_protocol_names(PROTOCOLS, criteria).unwrap()
    }

    #[test]
    fn test_no_criteria_keeps_everything() {
        assert_eq!(filter(&ProtocolCriteria::default()).len(), 4);
    }

    #[test]
    fn test_organ_system_is_case_insensitive_substring() {
        let matched = filter(&ProtocolCriteria::default().organ_system("respiratory"));
        assert_eq!(
            matched,
            vec!["Lung Respiratory V2.0 2022", "Respiratory Tract 1.0 2023"]
        );
    }

    #[test]
    fn test_blank_organ_system_is_ignored() {
        assert_eq!(filter(&ProtocolCriteria::default().organ_system("  ")).len(), 4);
    }

    #[test]
    fn test_year_matches_whole_word() {
        let matched = filter(&ProtocolCriteria::default().year(2023));
        assert_eq!(matched, vec!["Breast Invasive v1.0 2023", "Respiratory Tract 1.0 2023"]);

        let names = ["Protocol 20231", "Protocol 2023"];
        let matched = filter_protocol_names(names, &ProtocolCriteria::default().year(2023)).unwrap();
        assert_eq!(matched, vec!["Protocol 2023"]);
    }

    #[test]
    fn test_year_out_of_range_rejected() {
        let result = filter_protocol_names(PROTOCOLS, &ProtocolCriteria::default().year(1800));
        assert!(matches!(
            result,
            Err(InsightError::InvalidArgument { name: "year", .. })
        ));
        assert!(filter_protocol_names(PROTOCOLS, &ProtocolCriteria::default().year(2101)).is_err());
        assert!(filter_protocol_names(PROTOCOLS, &ProtocolCriteria::default().year(1900)).is_ok());
    }

    #[test]
    fn test_version_with_prefix() {
        let matched = filter(&ProtocolCriteria::default().version("v2.0"));
        assert_eq!(matched, vec!["Lung Respiratory V2.0 2022"]);
    }

    #[test]
    fn test_version_without_prefix_matches_both_forms() {
        let matched = filter(&ProtocolCriteria::default().version("1.0"));
        assert_eq!(matched, vec!["Breast Invasive v1.0 2023", "Respiratory Tract 1.0 2023"]);
    }

    #[test]
    fn test_version_dot_is_literal() {
        let names = ["Protocol v1x0", "Protocol v1.0"];
        let matched = filter_protocol_names(names, &ProtocolCriteria::default().version("1.0")).unwrap();
        assert_eq!(matched, vec!["Protocol v1.0"]);
    }

    #[test]
    fn test_distinct_names_sorted_ordinally() {
        let reports = [
            report("1", "b protocol"),
            report("2", "A protocol"),
            report("3", "b protocol"),
            report("4", "B protocol"),
        ];
        assert_eq!(
            distinct_protocol_names(&reports),
            vec!["A protocol", "B protocol", "b protocol"]
        );
    }

    #[test]
    fn test_search_orders_by_protocol_then_load_order() {
        let reports = [
            report("1", "Respiratory Tract 1.0 2023"),
            report("2", "Breast Invasive v1.0 2023"),
            report("3", "Respiratory Tract 1.0 2023"),
            report("4", "Colon Resection v3.1 2020"),
        ];
        let page = search_protocols(&reports, &ProtocolCriteria::default().year(2023), 10, None).unwrap();

        let cases: Vec<&str> = page.items.iter().map(|r| r.case_number.as_str()).collect();
        assert_eq!(cases, vec!["2", "1", "3"]);
        assert_eq!(page.total_count, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn test_search_pages_results() {
        let reports: Vec<Report> = (0..15)
            .map(|i| report(&i.to_string(), PROTOCOLS[i % PROTOCOLS.len()]))
            .collect();
        let page = search_protocols(&reports, &ProtocolCriteria::default(), 10, None).unwrap();

        assert_eq!(page.total_count, 15);
        assert!(page.has_more);
        assert!(page.next_cursor.is_some());
    }
}
