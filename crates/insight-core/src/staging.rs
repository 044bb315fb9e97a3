//! Clinical versus pathological staging concordance.

use chrono::NaiveDate;
use insight_model::{DiscordancePattern, Report, StagingConcordanceResponse, StagingTrendingData};
use tracing::{debug, info_span};

use crate::benchmark::{BenchmarkMetric, BenchmarkProvider, compare_to_benchmark};
use crate::error::Result;
use crate::period::{DateRange, group_by_month, matches_criterion, ratio};

/// Filters for a staging concordance analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub staging_system: Option<String>,
    pub tumor_type: Option<String>,
    /// Compare against this benchmark when set and non-empty.
    pub benchmark_type: Option<String>,
}

impl StagingQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            staging_system: None,
            tumor_type: None,
            benchmark_type: None,
        }
    }

    pub fn staging_system(mut self, staging_system: impl Into<String>) -> Self {
        self.staging_system = Some(staging_system.into());
        self
    }

    pub fn tumor_type(mut self, tumor_type: impl Into<String>) -> Self {
        self.tumor_type = Some(tumor_type.into());
        self
    }

    pub fn benchmark_type(mut self, benchmark_type: impl Into<String>) -> Self {
        self.benchmark_type = Some(benchmark_type.into());
        self
    }

    fn matches(&self, range: &DateRange, report: &Report) -> bool {
        let clinical = &report.clinical;
        range.contains(report.date)
            && report.stage_pair().is_some()
            && matches_criterion(self.staging_system.as_deref(), clinical.staging_system.as_deref())
            && matches_criterion(self.tumor_type.as_deref(), clinical.tumor_type.as_deref())
    }
}

/// Measures how often the clinical stage agrees with the pathological stage.
///
/// Only reports carrying both stages take part. Stages agree when the two
/// strings are identical.
///
/// # Errors
///
/// [`InsightError::InvalidArgument`](crate::InsightError::InvalidArgument)
/// if the start date is after the end date.
pub fn analyze_staging(
    reports: &[Report],
    query: &StagingQuery,
    benchmarks: &dyn BenchmarkProvider,
) -> Result<StagingConcordanceResponse> {
    let range = DateRange::new(query.start_date, query.end_date)?;
    let _span = info_span!(
        "analyze_staging",
        start = %range.start(),
        end = %range.end()
    )
    .entered();

    let selected: Vec<&Report> = reports.iter().filter(|r| query.matches(&range, r)).collect();
    let concordant = count_concordant(&selected);
    let overall_concordance_rate = ratio(concordant, selected.len());

    let trending_data = group_by_month(&selected)
        .into_iter()
        .map(|bucket| {
            let concordant_cases = count_concordant(&bucket.reports);
            StagingTrendingData {
                date: bucket.month,
                total_cases: bucket.reports.len(),
                concordant_cases,
                concordance_rate: ratio(concordant_cases, bucket.reports.len()),
            }
        })
        .collect();

    let benchmark_comparison = compare_to_benchmark(
        benchmarks,
        BenchmarkMetric::StagingConcordance,
        query.benchmark_type.as_deref(),
        overall_concordance_rate,
    );

    debug!(
        reports = selected.len(),
        concordant,
        "computed staging concordance"
    );
    Ok(StagingConcordanceResponse {
        total_cases: selected.len(),
        overall_concordance_rate,
        trending_data,
        discordance_patterns: discordance_patterns(&selected),
        benchmark_comparison,
    })
}

fn count_concordant(reports: &[&Report]) -> usize {
    reports.iter().filter(|r| r.is_stage_concordant()).count()
}

/// Groups discordant reports by stage pair, most frequent first.
fn discordance_patterns(reports: &[&Report]) -> Vec<DiscordancePattern> {
    let mut groups: Vec<((&str, &str), Vec<&Report>)> = Vec::new();
    for &report in reports {
        let Some(pair) = report.stage_pair().filter(|(c, p)| c != p) else {
            continue;
        };
        match groups.iter_mut().find(|(key, _)| *key == pair) {
            Some((_, members)) => members.push(report),
            None => groups.push((pair, vec![report])),
        }
    }

    let total_discordant: usize = groups.iter().map(|(_, members)| members.len()).sum();
    let mut patterns: Vec<DiscordancePattern> = groups
        .into_iter()
        .map(|((clinical, pathological), members)| DiscordancePattern {
            clinical_stage: clinical.to_string(),
            pathological_stage: pathological.to_string(),
            frequency: members.len(),
            percentage: ratio(members.len(), total_discordant),
            common_factors: common_factors(&members),
        })
        .collect();
    patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    patterns
}

/// Describes what the reports of one discordance pattern have in common.
fn common_factors(reports: &[&Report]) -> Option<String> {
    let mut factors = Vec::new();

    let total_size: f64 = reports.iter().map(|r| r.tumor_size_or_zero()).sum();
    let average_size = total_size / reports.len() as f64;
    if average_size > 0.0 {
        // Halves round away from zero, so 2.25 reads as 2.3.
        let rounded = (average_size * 10.0).round() / 10.0;
        factors.push(format!("Average tumor size: {rounded:.1} cm"));
    }

    // Absent tumor types count as a value of their own.
    let mut tallies: Vec<(Option<&str>, usize)> = Vec::new();
    for report in reports {
        let tumor_type = report.clinical.tumor_type.as_deref();
        match tallies.iter_mut().find(|(t, _)| *t == tumor_type) {
            Some((_, count)) => *count += 1,
            None => tallies.push((tumor_type, 1)),
        }
    }
    let mut most_common: Option<(Option<&str>, usize)> = None;
    for (tumor_type, count) in tallies {
        if most_common.is_none_or(|(_, best)| count > best) {
            most_common = Some((tumor_type, count));
        }
    }
    if let Some((Some(tumor_type), _)) = most_common
        && !tumor_type.is_empty()
    {
        factors.push(format!("Common tumor type: {tumor_type}"));
    }

    (!factors.is_empty()).then(|| factors.join(", "))
}
