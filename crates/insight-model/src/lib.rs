pub mod analytics;
pub mod paging;
pub mod report;
pub mod row;
pub mod text;

pub use analytics::{
    BenchmarkComparison, DiscordancePattern, FieldStatistics, MarginAnalysisResponse,
    StagingConcordanceResponse, StagingTrendingData, TrendingDataPoint, TumorCorrelation,
    ValueDistribution,
};
pub use paging::PagedResult;
pub use report::{NEGATIVE_MARGIN, Report};
pub use row::{ClinicalAttributes, ResultRow};
