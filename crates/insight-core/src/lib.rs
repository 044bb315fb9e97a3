pub mod aggregate;
pub mod benchmark;
pub mod cursor;
pub mod error;
pub mod field_stats;
pub mod margin;
pub mod pagination;
pub mod period;
pub mod protocol_search;
pub mod staging;
pub mod store;

pub use aggregate::group_reports;
pub use benchmark::{
    BenchmarkMetric, BenchmarkProvider, DEFAULT_MARGIN_ADEQUACY_BENCHMARK,
    DEFAULT_STAGING_CONCORDANCE_BENCHMARK, FixedBenchmarks,
};
pub use cursor::{decode_cursor, encode_cursor};
pub use error::{InsightError, Result};
pub use field_stats::analyze_field;
pub use margin::{MarginQuery, analyze_margins};
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, clamp_page_size, normalize_cursor, paginate};
pub use period::DateRange;
pub use protocol_search::{
    MAX_PROTOCOL_YEAR, MIN_PROTOCOL_YEAR, ProtocolCriteria, distinct_protocol_names,
    filter_protocol_names, search_protocols,
};
pub use staging::{StagingQuery, analyze_staging};
pub use store::{LoadedData, ReportStore};
