//! Answer distributions for a single question.

use std::collections::HashMap;

use insight_model::text::eq_ignore_case;
use insight_model::{FieldStatistics, ResultRow, ValueDistribution};
use tracing::{debug, info_span};

use crate::error::{InsightError, Result};

/// Tallies the answers given to `field_name` across `rows`.
///
/// Questions match `field_name` case-insensitively. Answers are grouped by
/// exact value and sorted by count, highest first; equal counts keep the
/// order in which the answers were first seen. Percentages are in `0..=100`.
///
/// # Errors
///
/// [`InsightError::InvalidArgument`] if `field_name` is blank.
pub fn analyze_field(rows: &[ResultRow], field_name: &str) -> Result<FieldStatistics> {
    if field_name.trim().is_empty() {
        return Err(InsightError::invalid_argument(
            "field_name",
            "field name must not be empty",
        ));
    }
    let _span = info_span!("analyze_field", field = field_name).entered();

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<(&str, usize)> = Vec::new();
    let mut total = 0usize;

    for row in rows.iter().filter(|r| eq_ignore_case(&r.question, field_name)) {
        total += 1;
        let answer = row.answer.as_str();
        match positions.get(answer).copied() {
            Some(position) => tallies[position].1 += 1,
            None => {
                positions.insert(answer, tallies.len());
                tallies.push((answer, 1));
            }
        }
    }

    if total == 0 {
        debug!("no rows match field");
        return Ok(FieldStatistics::empty(field_name));
    }

    // Stable sort keeps first-seen order among equal counts.
    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    let values = tallies
        .into_iter()
        .map(|(value, count)| ValueDistribution {
            value: value.to_string(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect::<Vec<_>>();

    debug!(count = total, values = values.len(), "computed field statistics");
    Ok(FieldStatistics {
        field_name: field_name.to_string(),
        total_count: total,
        values,
    })
}
