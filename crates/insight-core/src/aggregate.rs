//! Grouping of result rows into per-case reports.

use std::collections::HashMap;

use insight_model::{Report, ResultRow};
use tracing::debug;

/// Groups rows by case number into reports, in first-seen case order.
///
/// Case numbers compare by exact string equality. Each report's text is the
/// `"{question}: {answer}"` line of every row of the case, joined by `\n` in
/// source order; identifying fields and the date come from the case's first
/// row, and each clinical attribute from the first row that carries it.
pub fn group_reports(rows: &[ResultRow]) -> Vec<Report> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut reports: Vec<Report> = Vec::new();

    for row in rows {
        match index.get(row.case_number.as_str()).copied() {
            Some(position) => {
                let report = &mut reports[position];
                report.report_text.push('\n');
                report.report_text.push_str(&row.text());
                report.clinical.fill_missing_from(&row.clinical);
            }
            None => {
                index.insert(row.case_number.as_str(), reports.len());
                reports.push(Report {
                    case_number: row.case_number.clone(),
                    report_loinc_code: row.report_loinc_code.clone(),
                    report_loinc_name: row.report_loinc_name.clone(),
                    protocol_name: row.protocol_name.clone(),
                    report_text: row.text(),
                    date: row.date,
                    clinical: row.clinical.clone(),
                });
            }
        }
    }

    debug!(rows = rows.len(), reports = reports.len(), "grouped rows by case");
    reports
}
