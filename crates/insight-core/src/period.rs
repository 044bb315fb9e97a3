//! Date-range filtering and monthly bucketing shared by the analyses.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use insight_model::Report;

use crate::error::{InsightError, Result};

/// An inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// [`InsightError::InvalidArgument`] when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(InsightError::invalid_argument(
                "start_date",
                format!("start date {start} must not be after end date {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Undated values are never inside a range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| self.start <= d && d <= self.end)
    }
}

/// Reports that share a calendar month.
#[derive(Debug)]
pub(crate) struct MonthBucket<'a> {
    /// First day of the month.
    pub month: NaiveDate,
    pub reports: Vec<&'a Report>,
}

/// Groups dated reports by (year, month), oldest month first.
pub(crate) fn group_by_month<'a>(reports: &[&'a Report]) -> Vec<MonthBucket<'a>> {
    let mut months: BTreeMap<NaiveDate, Vec<&'a Report>> = BTreeMap::new();
    for report in reports {
        if let Some(date) = report.date {
            months.entry(first_of_month(date)).or_default().push(*report);
        }
    }
    months
        .into_iter()
        .map(|(month, reports)| MonthBucket { month, reports })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// `part / whole`, or zero for an empty whole.
pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Treats an absent or empty criterion as "match anything".
pub(crate) fn matches_criterion(criterion: Option<&str>, value: Option<&str>) -> bool {
    match criterion.filter(|c| !c.is_empty()) {
        Some(wanted) => value == Some(wanted),
        None => true,
    }
}
