//! Result types returned by the analytics engines.
//!
//! Every type serializes with camelCase field names and omits absent optional
//! fields, which is the shape the tool layer hands back to its callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Count and share of one distinct answer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDistribution {
    pub value: String,
    pub count: usize,
    /// Share of all matching rows, in percent (0-100).
    pub percentage: f64,
}

/// Distribution of answers given to one question across all rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldStatistics {
    /// The field name exactly as the caller supplied it.
    pub field_name: String,
    pub total_count: usize,
    /// Sorted by count, highest first.
    pub values: Vec<ValueDistribution>,
}

impl FieldStatistics {
    pub fn empty(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            total_count: 0,
            values: Vec::new(),
        }
    }
}

/// Comparison of a computed rate against a reference rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub benchmark_type: String,
    pub benchmark_rate: f64,
    /// `current - benchmark_rate`; negative when below the benchmark.
    pub difference: f64,
    pub is_above_benchmark: bool,
}

impl BenchmarkComparison {
    pub fn new(benchmark_type: impl Into<String>, current_rate: f64, benchmark_rate: f64) -> Self {
        Self {
            benchmark_type: benchmark_type.into(),
            benchmark_rate,
            difference: current_rate - benchmark_rate,
            is_above_benchmark: current_rate > benchmark_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingDataPoint {
    /// First day of the month this point covers.
    pub date: NaiveDate,
    pub total_cases: usize,
    pub negative_margins: usize,
    pub adequacy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TumorCorrelation {
    pub tumor_type: String,
    pub total_cases: usize,
    pub average_tumor_size: f64,
    pub margin_adequacy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAnalysisResponse {
    pub total_cases: usize,
    pub margin_adequacy_rate: f64,
    pub trending_data: Vec<TrendingDataPoint>,
    pub tumor_correlations: Vec<TumorCorrelation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_comparison: Option<BenchmarkComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingTrendingData {
    /// First day of the month this point covers.
    pub date: NaiveDate,
    pub total_cases: usize,
    pub concordant_cases: usize,
    pub concordance_rate: f64,
}

/// A recurring clinical/pathological stage mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordancePattern {
    pub clinical_stage: String,
    pub pathological_stage: String,
    pub frequency: usize,
    /// Share of all discordant cases, as a ratio in `[0, 1]`.
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_factors: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingConcordanceResponse {
    pub total_cases: usize,
    pub overall_concordance_rate: f64,
    pub trending_data: Vec<StagingTrendingData>,
    pub discordance_patterns: Vec<DiscordancePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_comparison: Option<BenchmarkComparison>,
}
