//! Command handlers. Each returns the text to print on stdout.

use anyhow::{Context, Result, anyhow};
use insight_core::{
    FixedBenchmarks, MarginQuery, ProtocolCriteria, ReportStore, StagingQuery, analyze_field,
    analyze_margins, analyze_staging, clamp_page_size, normalize_cursor,
};
use tracing::{debug, info_span};

use crate::cli::{
    Cli, Command, FieldStatsArgs, MarginArgs, PageArgs, ProtocolsArgs, ReportArgs, ReportsArgs,
    SearchProtocolsArgs, StagingArgs,
};
use crate::output::{field_stats_table, protocol_table, to_json};

/// Everything a command needs: the report store and the benchmark rates.
pub struct CommandContext {
    pub store: ReportStore,
    pub benchmarks: FixedBenchmarks,
}

impl CommandContext {
    /// Builds the context from global options. The store loads lazily.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let benchmarks = FixedBenchmarks::new(cli.margin_benchmark, cli.staging_benchmark)
            .context("invalid benchmark rate")?;
        Ok(Self {
            store: ReportStore::new(&cli.data),
            benchmarks,
        })
    }
}

pub fn run_command(command: &Command, context: &CommandContext) -> Result<String> {
    match command {
        Command::Reports(args) => run_reports(context, args),
        Command::Report(args) => run_report(context, args),
        Command::Protocols(args) => run_protocols(context, args),
        Command::SearchProtocols(args) => run_search_protocols(context, args),
        Command::FieldStats(args) => run_field_stats(context, args),
        Command::Margins(args) => run_margins(context, args),
        Command::Staging(args) => run_staging(context, args),
    }
}

/// Clamped page size and normalized cursor.
fn page_options(page: &PageArgs) -> (usize, Option<&str>) {
    let page_size = clamp_page_size(page.page_size);
    let cursor = normalize_cursor(page.cursor.as_deref());
    debug!(page_size, has_cursor = cursor.is_some(), "page options");
    (page_size, cursor)
}

fn load_context(context: &CommandContext) -> String {
    format!("load results from {}", context.store.source().display())
}

pub fn run_reports(context: &CommandContext, args: &ReportsArgs) -> Result<String> {
    let (page_size, cursor) = page_options(&args.page);
    context.store.data().with_context(|| load_context(context))?;
    let page = match args.protocol.as_deref() {
        Some(protocol) => context
            .store
            .reports_by_protocol(protocol, page_size, cursor)
            .context("list reports by protocol")?,
        None => context
            .store
            .reports_page(page_size, cursor)
            .context("list reports")?,
    };
    to_json(&page)
}

pub fn run_report(context: &CommandContext, args: &ReportArgs) -> Result<String> {
    let report = context
        .store
        .report(&args.case_number)
        .with_context(|| load_context(context))?
        .ok_or_else(|| anyhow!("no report found for case '{}'", args.case_number))?;
    to_json(&report)
}

pub fn run_protocols(context: &CommandContext, args: &ProtocolsArgs) -> Result<String> {
    let names = context
        .store
        .distinct_protocol_names()
        .with_context(|| load_context(context))?;
    if args.table {
        Ok(protocol_table(&names).to_string())
    } else {
        to_json(&names)
    }
}

pub fn run_search_protocols(context: &CommandContext, args: &SearchProtocolsArgs) -> Result<String> {
    let (page_size, cursor) = page_options(&args.page);
    let criteria = ProtocolCriteria {
        organ_system: args.organ_system.clone(),
        year: args.year,
        version: args.version.clone(),
    };
    context.store.data().with_context(|| load_context(context))?;
    let page = context
        .store
        .search_protocols(&criteria, page_size, cursor)
        .context("search protocols")?;
    to_json(&page)
}

pub fn run_field_stats(context: &CommandContext, args: &FieldStatsArgs) -> Result<String> {
    let rows = context.store.rows().with_context(|| load_context(context))?;
    let stats = analyze_field(&rows, &args.field).context("field statistics")?;
    if args.table {
        Ok(field_stats_table(&stats).to_string())
    } else {
        to_json(&stats)
    }
}

pub fn run_margins(context: &CommandContext, args: &MarginArgs) -> Result<String> {
    let _span = info_span!("margins").entered();
    let query = MarginQuery {
        start_date: args.start,
        end_date: args.end,
        procedure_type: args.procedure_type.clone(),
        tumor_type: args.tumor_type.clone(),
        tumor_size: args.tumor_size,
        benchmark_type: args.benchmark_type.clone(),
    };
    let reports = context.store.reports().with_context(|| load_context(context))?;
    let response =
        analyze_margins(&reports, &query, &context.benchmarks).context("margin analysis")?;
    to_json(&response)
}

pub fn run_staging(context: &CommandContext, args: &StagingArgs) -> Result<String> {
    let _span = info_span!("staging").entered();
    let query = StagingQuery {
        start_date: args.start,
        end_date: args.end,
        staging_system: args.staging_system.clone(),
        tumor_type: args.tumor_type.clone(),
        benchmark_type: args.benchmark_type.clone(),
    };
    let reports = context.store.reports().with_context(|| load_context(context))?;
    let response =
        analyze_staging(&reports, &query, &context.benchmarks).context("staging analysis")?;
    to_json(&response)
}
