//! CLI argument definitions for the pathology insights tool.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use insight_core::{DEFAULT_MARGIN_ADEQUACY_BENCHMARK, DEFAULT_STAGING_CONCORDANCE_BENCHMARK};

#[derive(Parser)]
#[command(
    name = "insight",
    version,
    about = "Pathology Report Insights - query synoptic results and quality metrics",
    long_about = "Query synoptic pathology results and compute quality metrics.\n\n\
                  Aggregates question/answer rows into per-case reports, pages through\n\
                  them, and reports answer distributions, margin adequacy and\n\
                  staging concordance as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the results CSV file.
    #[arg(
        long = "data",
        value_name = "PATH",
        env = "INSIGHT_DATA_PATH",
        default_value = "Data/results.csv",
        global = true
    )]
    pub data: PathBuf,

    /// Reference margin adequacy rate for benchmark comparisons.
    #[arg(
        long = "margin-benchmark",
        value_name = "RATE",
        default_value_t = DEFAULT_MARGIN_ADEQUACY_BENCHMARK,
        global = true
    )]
    pub margin_benchmark: f64,

    /// Reference staging concordance rate for benchmark comparisons.
    #[arg(
        long = "staging-benchmark",
        value_name = "RATE",
        default_value_t = DEFAULT_STAGING_CONCORDANCE_BENCHMARK,
        global = true
    )]
    pub staging_benchmark: f64,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List reports, optionally restricted to one protocol.
    Reports(ReportsArgs),

    /// Show the report for a single case.
    Report(ReportArgs),

    /// List distinct protocol names.
    Protocols(ProtocolsArgs),

    /// Search protocols by organ system, year and version.
    SearchProtocols(SearchProtocolsArgs),

    /// Show the answer distribution for one question.
    FieldStats(FieldStatsArgs),

    /// Analyze surgical margin adequacy over a date range.
    Margins(MarginArgs),

    /// Analyze clinical versus pathological staging concordance.
    Staging(StagingArgs),
}

/// Paging options shared by listing commands.
#[derive(Args, Clone, Default)]
pub struct PageArgs {
    /// Items per page (1-100, default 10).
    #[arg(long = "page-size", value_name = "N", allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Cursor from a previous page's nextCursor.
    #[arg(long = "cursor", value_name = "CURSOR")]
    pub cursor: Option<String>,
}

#[derive(Args)]
pub struct ReportsArgs {
    /// Only list reports of this protocol (case-insensitive).
    #[arg(long = "protocol", value_name = "NAME")]
    pub protocol: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Case number, matched exactly.
    #[arg(value_name = "CASE_NUMBER")]
    pub case_number: String,
}

#[derive(Args)]
pub struct ProtocolsArgs {
    /// Render a table instead of JSON.
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Args)]
pub struct SearchProtocolsArgs {
    /// Case-insensitive text contained in the protocol name.
    #[arg(long = "organ-system", value_name = "TEXT")]
    pub organ_system: Option<String>,

    /// Year appearing in the protocol name (1900-2100).
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<i32>,

    /// Protocol version, with or without a leading 'v'.
    #[arg(id = "protocol_version", long = "version", value_name = "VERSION")]
    pub version: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args)]
pub struct FieldStatsArgs {
    /// Question to summarize (case-insensitive).
    #[arg(value_name = "FIELD")]
    pub field: String,

    /// Render a table instead of JSON.
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Args)]
pub struct MarginArgs {
    /// First day of the range (YYYY-MM-DD).
    #[arg(long = "start", value_name = "DATE")]
    pub start: NaiveDate,

    /// Last day of the range (YYYY-MM-DD), inclusive.
    #[arg(long = "end", value_name = "DATE")]
    pub end: NaiveDate,

    #[arg(long = "procedure-type", value_name = "TYPE")]
    pub procedure_type: Option<String>,

    #[arg(long = "tumor-type", value_name = "TYPE")]
    pub tumor_type: Option<String>,

    /// Exact tumor size in cm.
    #[arg(long = "tumor-size", value_name = "CM")]
    pub tumor_size: Option<f64>,

    /// Compare the adequacy rate against this benchmark.
    #[arg(long = "benchmark-type", value_name = "NAME")]
    pub benchmark_type: Option<String>,
}

#[derive(Args)]
pub struct StagingArgs {
    /// First day of the range (YYYY-MM-DD).
    #[arg(long = "start", value_name = "DATE")]
    pub start: NaiveDate,

    /// Last day of the range (YYYY-MM-DD), inclusive.
    #[arg(long = "end", value_name = "DATE")]
    pub end: NaiveDate,

    #[arg(long = "staging-system", value_name = "SYSTEM")]
    pub staging_system: Option<String>,

    #[arg(long = "tumor-type", value_name = "TYPE")]
    pub tumor_type: Option<String>,

    /// Compare the concordance rate against this benchmark.
    #[arg(long = "benchmark-type", value_name = "NAME")]
    pub benchmark_type: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
