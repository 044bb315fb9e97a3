//! Load-once report store.
//!
//! [`ReportStore`] reads the source table on first access and keeps the rows
//! and their aggregated reports as shared immutable snapshots. Concurrent
//! first callers wait on a single load; a failed load is not remembered, so a
//! later call tries again.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use insight_ingest::load_result_rows;
use insight_model::text::eq_ignore_case;
use insight_model::{PagedResult, Report, ResultRow};
use tracing::{debug, info};

use crate::aggregate::group_reports;
use crate::error::Result;
use crate::pagination::paginate;
use crate::protocol_search::{self, ProtocolCriteria};

/// Rows of the source table and the reports built from them.
#[derive(Debug)]
pub struct LoadedData {
    rows: Arc<[ResultRow]>,
    reports: Arc<[Report]>,
}

impl LoadedData {
    pub fn from_rows(rows: Vec<ResultRow>) -> Self {
        let reports = group_reports(&rows);
        Self {
            rows: rows.into(),
            reports: reports.into(),
        }
    }

    pub fn rows(&self) -> &Arc<[ResultRow]> {
        &self.rows
    }

    pub fn reports(&self) -> &Arc<[Report]> {
        &self.reports
    }
}

/// Reads the rows of a source table.
type Loader = fn(&Path) -> insight_ingest::Result<Vec<ResultRow>>;

/// Lazily loaded, read-only view of one results table.
///
/// To pick up changes to the source, construct a new store.
#[derive(Debug)]
pub struct ReportStore {
    source: PathBuf,
    loader: Loader,
    data: OnceLock<Arc<LoadedData>>,
    load_lock: Mutex<()>,
}

impl ReportStore {
    /// Creates a store over `source`. Nothing is read until first access.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self::with_loader(source, load_result_rows)
    }

    fn with_loader(source: impl Into<PathBuf>, loader: Loader) -> Self {
        Self {
            source: source.into(),
            loader,
            data: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Creates a store over rows that are already in memory.
    pub fn from_rows(rows: Vec<ResultRow>) -> Self {
        Self {
            source: PathBuf::new(),
            loader: load_result_rows,
            data: OnceLock::from(Arc::new(LoadedData::from_rows(rows))),
            load_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the loaded data, reading the source if this is the first use.
    ///
    /// # Errors
    ///
    /// [`InsightError::Ingest`](crate::InsightError::Ingest) if the source
    /// cannot be loaded.
    pub fn data(&self) -> Result<Arc<LoadedData>> {
        if let Some(data) = self.data.get() {
            return Ok(Arc::clone(data));
        }

        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished loading while we waited.
        if let Some(data) = self.data.get() {
            return Ok(Arc::clone(data));
        }

        debug!(path = %self.source.display(), "loading report store");
        let rows = (self.loader)(&self.source)?;
        let data = Arc::new(LoadedData::from_rows(rows));
        info!(
            path = %self.source.display(),
            rows = data.rows.len(),
            reports = data.reports.len(),
            "report store loaded"
        );
        Ok(Arc::clone(self.data.get_or_init(|| data)))
    }

    pub fn rows(&self) -> Result<Arc<[ResultRow]>> {
        Ok(Arc::clone(self.data()?.rows()))
    }

    pub fn reports(&self) -> Result<Arc<[Report]>> {
        Ok(Arc::clone(self.data()?.reports()))
    }

    /// One page of all reports, in load order.
    ///
    /// # Errors
    ///
    /// Load failures, a zero `page_size`, or a malformed `cursor`.
    pub fn reports_page(&self, page_size: usize, cursor: Option<&str>) -> Result<PagedResult<Report>> {
        let reports = self.reports()?;
        paginate(reports.iter().cloned(), page_size, cursor)
    }

    /// One page of the reports whose protocol name equals `protocol`,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// Load failures, a zero `page_size`, or a malformed `cursor`.
    pub fn reports_by_protocol(
        &self,
        protocol: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<PagedResult<Report>> {
        let reports = self.reports()?;
        let matching = reports
            .iter()
            .filter(|r| eq_ignore_case(&r.protocol_name, protocol))
            .cloned();
        paginate(matching, page_size, cursor)
    }

    /// The report for `case_number`, matched exactly.
    ///
    /// # Errors
    ///
    /// Load failures.
    pub fn report(&self, case_number: &str) -> Result<Option<Report>> {
        let reports = self.reports()?;
        Ok(reports.iter().find(|r| r.case_number == case_number).cloned())
    }

    /// Distinct protocol names in ordinal order.
    ///
    /// # Errors
    ///
    /// Load failures.
    pub fn distinct_protocol_names(&self) -> Result<Vec<String>> {
        Ok(protocol_search::distinct_protocol_names(&self.reports()?))
    }

    /// One page of the reports filed under protocols matching `criteria`.
    ///
    /// # Errors
    ///
    /// Load failures, an out-of-range year, a zero `page_size`, or a
    /// malformed `cursor`.
    pub fn search_protocols(
        &self,
        criteria: &ProtocolCriteria,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<PagedResult<Report>> {
        protocol_search::search_protocols(&self.reports()?, criteria, page_size, cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightError;
    use insight_ingest::IngestError;
    use insight_model::ClinicalAttributes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn row(case: &str, protocol: &str, question: &str, answer: &str) -> ResultRow {
        ResultRow {
            case_number: case.to_string(),
            report_loinc_code: "60568-3".to_string(),
            report_loinc_name: "Pathology Synoptic report".to_string(),
            protocol_name: protocol.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            date: None,
            clinical: ClinicalAttributes::default(),
        }
    }

    fn store() -> ReportStore {
        ReportStore::from_rows(vec![
            row("A", "Test Protocol Name", "Q1", "A1"),
            row("B", "Other Protocol", "Q1", "B1"),
            row("A", "Test Protocol Name", "Q2", "A2"),
            row("C", "test protocol name", "Q1", "C1"),
        ])
    }

    static CONCURRENT_LOADS: AtomicUsize = AtomicUsize::new(0);
    static FLAKY_LOADS: AtomicUsize = AtomicUsize::new(0);

    fn slow_loader(_path: &Path) -> insight_ingest::Result<Vec<ResultRow>> {
        CONCURRENT_LOADS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        Ok(vec![row("A", "Test Protocol Name", "Q1", "A1")])
    }

    fn fails_first_loader(path: &Path) -> insight_ingest::Result<Vec<ResultRow>> {
        if FLAKY_LOADS.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(vec![row("A", "Test Protocol Name", "Q1", "A1")])
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let store = ReportStore::with_loader("results.csv", slow_loader);
        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| store.reports().unwrap());
            }
        });

        assert_eq!(CONCURRENT_LOADS.load(Ordering::SeqCst), 1);
        store.rows().unwrap();
        assert_eq!(CONCURRENT_LOADS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let store = ReportStore::with_loader("results.csv", fails_first_loader);

        let err = store.reports().unwrap_err();
        assert!(matches!(err, InsightError::Ingest(ref e) if e.is_not_found()));
        assert_eq!(store.reports().unwrap().len(), 1);
        store.reports().unwrap();
        assert_eq!(FLAKY_LOADS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReportStore>();
    }

    #[test]
    fn test_reports_are_grouped() {
        let reports = store().reports().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].report_text, "Q1: A1\nQ2: A2");
    }

    #[test]
    fn test_reports_by_protocol_ignores_case() {
        let page = store()
            .reports_by_protocol("TEST PROTOCOL NAME", 10, None)
            .unwrap();
        let cases: Vec<&str> = page.items.iter().map(|r| r.case_number.as_str()).collect();
        assert_eq!(cases, vec!["A", "C"]);
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_report_lookup_is_exact() {
        let store = store();
        assert!(store.report("B").unwrap().is_some());
        assert!(store.report("b").unwrap().is_none());
    }

    #[test]
    fn test_reports_page_rejects_bad_cursor() {
        let result = store().reports_page(10, Some("invalid_cursor"));
        assert!(matches!(result, Err(InsightError::MalformedCursor { .. })));
    }

    #[test]
    fn test_distinct_protocol_names() {
        let names = store().distinct_protocol_names().unwrap();
        assert_eq!(
            names,
            vec!["Other Protocol", "Test Protocol Name", "test protocol name"]
        );
    }
}
