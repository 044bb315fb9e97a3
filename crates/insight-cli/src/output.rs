//! Rendering of command results for the terminal.

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use insight_model::FieldStatistics;
use serde::Serialize;

/// Pretty-printed JSON with camelCase names and absent fields omitted.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serialize output")
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn protocol_table(names: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Protocol Name"]);
    apply_table_style(&mut table);
    for (index, name) in names.iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), name.clone()]);
    }
    table
}

pub fn field_stats_table(stats: &FieldStatistics) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Value", "Count", "Percentage"]);
    apply_table_style(&mut table);
    for value in &stats.values {
        table.add_row(vec![
            value.value.clone(),
            value.count.to_string(),
            format!("{:.2}%", value.percentage),
        ]);
    }
    for index in 1..=2 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}
