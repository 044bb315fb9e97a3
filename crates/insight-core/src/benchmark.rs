//! Reference rates the analyses compare against.

use insight_model::BenchmarkComparison;

use crate::error::{InsightError, Result};

/// Reference margin adequacy rate used when none is configured.
pub const DEFAULT_MARGIN_ADEQUACY_BENCHMARK: f64 = 0.85;
/// Reference staging concordance rate used when none is configured.
pub const DEFAULT_STAGING_CONCORDANCE_BENCHMARK: f64 = 0.75;

/// The rate a benchmark applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkMetric {
    MarginAdequacy,
    StagingConcordance,
}

/// Source of benchmark reference rates.
pub trait BenchmarkProvider: Send + Sync {
    /// Reference rate in `[0, 1]` for `metric` under the named benchmark.
    fn reference_rate(&self, metric: BenchmarkMetric, benchmark_type: &str) -> f64;
}

/// One configured rate per metric, regardless of benchmark type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBenchmarks {
    margin_adequacy: f64,
    staging_concordance: f64,
}

impl FixedBenchmarks {
    /// # Errors
    ///
    /// [`InsightError::InvalidArgument`] if a rate lies outside `[0, 1]`.
    pub fn new(margin_adequacy: f64, staging_concordance: f64) -> Result<Self> {
        check_rate("margin_benchmark", margin_adequacy)?;
        check_rate("staging_benchmark", staging_concordance)?;
        Ok(Self {
            margin_adequacy,
            staging_concordance,
        })
    }

    pub fn margin_adequacy(&self) -> f64 {
        self.margin_adequacy
    }

    pub fn staging_concordance(&self) -> f64 {
        self.staging_concordance
    }
}

fn check_rate(name: &'static str, rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(InsightError::invalid_argument(
            name,
            format!("benchmark rate {rate} is outside [0, 1]"),
        ))
    }
}

impl Default for FixedBenchmarks {
    fn default() -> Self {
        Self {
            margin_adequacy: DEFAULT_MARGIN_ADEQUACY_BENCHMARK,
            staging_concordance: DEFAULT_STAGING_CONCORDANCE_BENCHMARK,
        }
    }
}

impl BenchmarkProvider for FixedBenchmarks {
    fn reference_rate(&self, metric: BenchmarkMetric, _benchmark_type: &str) -> f64 {
        match metric {
            BenchmarkMetric::MarginAdequacy => self.margin_adequacy,
            BenchmarkMetric::StagingConcordance => self.staging_concordance,
        }
    }
}

/// Builds a comparison when a non-empty benchmark type was requested.
pub(crate) fn compare_to_benchmark(
    provider: &dyn BenchmarkProvider,
    metric: BenchmarkMetric,
    benchmark_type: Option<&str>,
    current_rate: f64,
) -> Option<BenchmarkComparison> {
    let benchmark_type = benchmark_type.filter(|b| !b.is_empty())?;
    let reference = provider.reference_rate(metric, benchmark_type);
    Some(BenchmarkComparison::new(benchmark_type, current_rate, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let benchmarks = FixedBenchmarks::default();
        assert_eq!(
            benchmarks.reference_rate(BenchmarkMetric::MarginAdequacy, "National"),
            0.85
        );
        assert_eq!(
            benchmarks.reference_rate(BenchmarkMetric::StagingConcordance, "National"),
            0.75
        );
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        assert!(FixedBenchmarks::new(1.5, 0.75).is_err());
        assert!(FixedBenchmarks::new(0.85, -0.1).is_err());
        assert!(FixedBenchmarks::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn test_no_comparison_without_type() {
        let benchmarks = FixedBenchmarks::default();
        assert!(compare_to_benchmark(&benchmarks, BenchmarkMetric::MarginAdequacy, None, 0.5).is_none());
        assert!(compare_to_benchmark(&benchmarks, BenchmarkMetric::MarginAdequacy, Some(""), 0.5).is_none());
    }

    #[test]
    fn test_comparison_uses_metric_rate() {
        let benchmarks = FixedBenchmarks::new(0.9, 0.6).unwrap();
        let comparison =
            compare_to_benchmark(&benchmarks, BenchmarkMetric::StagingConcordance, Some("Regional"), 0.7)
                .unwrap();
        assert_eq!(comparison.benchmark_type, "Regional");
        assert_eq!(comparison.benchmark_rate, 0.6);
        assert!(comparison.is_above_benchmark);
    }
}
