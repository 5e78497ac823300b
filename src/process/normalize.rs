// src/process/normalize.rs
use tracing::debug;

use super::{Column, ColumnData, Dataset};

/// Coerce every text column to numbers, in column order.
///
/// A column where any value carries a trailing `%` is a percent column: each
/// value is stripped of the marker and parsed, and values without the marker
/// fall back to a plain parse rather than failing the whole column. All other
/// text columns go through the plain parse. Whatever cannot be parsed becomes
/// `None`. Columns that are already numeric pass through untouched.
pub fn normalize(dataset: Dataset) -> Dataset {
    Dataset {
        columns: dataset.columns.into_iter().map(normalize_column).collect(),
    }
}

fn normalize_column(column: Column) -> Column {
    let values = match column.data {
        // Idempotent on numeric columns.
        ColumnData::Numeric(_) => return column,
        ColumnData::Text(values) => values,
    };

    let is_percent = values.iter().any(|v| v.trim_end().ends_with('%'));
    let numbers: Vec<Option<f64>> = values
        .iter()
        .map(|v| {
            if is_percent {
                parse_percent(v)
            } else {
                parse_plain(v)
            }
        })
        .collect();

    let missing = numbers.iter().filter(|n| n.is_none()).count();
    debug!(
        column = %column.name,
        percent = is_percent,
        missing,
        "normalized column"
    );

    Column {
        name: column.name,
        data: ColumnData::Numeric(numbers),
    }
}

/// Strip a trailing `%` and parse. Values without the marker get a plain
/// parse, so one stray percent sign does not blank out the rest of a column.
fn parse_percent(value: &str) -> Option<f64> {
    let value = value.trim();
    match value.strip_suffix('%') {
        Some(rest) => rest.trim_end().parse().ok(),
        None => value.parse().ok(),
    }
}

fn parse_plain(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}
