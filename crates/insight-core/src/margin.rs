//! Surgical margin adequacy analysis.

use chrono::NaiveDate;
use insight_model::{MarginAnalysisResponse, Report, TrendingDataPoint, TumorCorrelation};
use tracing::{debug, info_span};

use crate::benchmark::{BenchmarkMetric, BenchmarkProvider, compare_to_benchmark};
use crate::error::Result;
use crate::period::{DateRange, group_by_month, matches_criterion, ratio};

/// Filters for a margin analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub procedure_type: Option<String>,
    pub tumor_type: Option<String>,
    pub tumor_size: Option<f64>,
    /// Compare against this benchmark when set and non-empty.
    pub benchmark_type: Option<String>,
}

impl MarginQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            procedure_type: None,
            tumor_type: None,
            tumor_size: None,
            benchmark_type: None,
        }
    }

    pub fn procedure_type(mut self, procedure_type: impl Into<String>) -> Self {
        self.procedure_type = Some(procedure_type.into());
        self
    }

    pub fn tumor_type(mut self, tumor_type: impl Into<String>) -> Self {
        self.tumor_type = Some(tumor_type.into());
        self
    }

    pub fn tumor_size(mut self, tumor_size: f64) -> Self {
        self.tumor_size = Some(tumor_size);
        self
    }

    pub fn benchmark_type(mut self, benchmark_type: impl Into<String>) -> Self {
        self.benchmark_type = Some(benchmark_type.into());
        self
    }

    fn matches(&self, range: &DateRange, report: &Report) -> bool {
        let clinical = &report.clinical;
        range.contains(report.date)
            && matches_criterion(self.procedure_type.as_deref(), clinical.procedure_type.as_deref())
            && matches_criterion(self.tumor_type.as_deref(), clinical.tumor_type.as_deref())
            && self
                .tumor_size
                .is_none_or(|size| clinical.tumor_size == Some(size))
    }
}

/// Computes margin adequacy for the reports selected by `query`.
///
/// A margin is adequate when its status reads "negative" in any case. Rates
/// are ratios in `[0, 1]` and are zero when nothing matches.
///
/// # Errors
///
/// [`InsightError::InvalidArgument`](crate::InsightError::InvalidArgument)
/// if the start date is after the end date.
pub fn analyze_margins(
    reports: &[Report],
    query: &MarginQuery,
    benchmarks: &dyn BenchmarkProvider,
) -> Result<MarginAnalysisResponse> {
    let range = DateRange::new(query.start_date, query.end_date)?;
    let _span = info_span!(
        "analyze_margins",
        start = %range.start(),
        end = %range.end()
    )
    .entered();

    let selected: Vec<&Report> = reports.iter().filter(|r| query.matches(&range, r)).collect();
    let adequate = count_negative(&selected);
    let margin_adequacy_rate = ratio(adequate, selected.len());

    let trending_data = group_by_month(&selected)
        .into_iter()
        .map(|bucket| {
            let negative_margins = count_negative(&bucket.reports);
            TrendingDataPoint {
                date: bucket.month,
                total_cases: bucket.reports.len(),
                negative_margins,
                adequacy_rate: ratio(negative_margins, bucket.reports.len()),
            }
        })
        .collect();

    let benchmark_comparison = compare_to_benchmark(
        benchmarks,
        BenchmarkMetric::MarginAdequacy,
        query.benchmark_type.as_deref(),
        margin_adequacy_rate,
    );

    debug!(
        reports = selected.len(),
        adequate,
        "computed margin adequacy"
    );
    Ok(MarginAnalysisResponse {
        total_cases: selected.len(),
        margin_adequacy_rate,
        trending_data,
        tumor_correlations: tumor_correlations(&selected),
        benchmark_comparison,
    })
}

fn count_negative(reports: &[&Report]) -> usize {
    reports.iter().filter(|r| r.has_negative_margin()).count()
}

/// One entry per tumor type, in first-seen order.
fn tumor_correlations(reports: &[&Report]) -> Vec<TumorCorrelation> {
    let mut groups: Vec<(&str, Vec<&Report>)> = Vec::new();
    for &report in reports {
        let Some(tumor_type) = report.tumor_type() else {
            continue;
        };
        match groups.iter_mut().find(|(t, _)| *t == tumor_type) {
            Some((_, members)) => members.push(report),
            None => groups.push((tumor_type, vec![report])),
        }
    }

    groups
        .into_iter()
        .map(|(tumor_type, members)| {
            let total_size: f64 = members.iter().map(|r| r.tumor_size_or_zero()).sum();
            TumorCorrelation {
                tumor_type: tumor_type.to_string(),
                total_cases: members.len(),
                average_tumor_size: total_size / members.len() as f64,
                margin_adequacy_rate: ratio(count_negative(&members), members.len()),
            }
        })
        .collect()
}
