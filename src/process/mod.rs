// src/process/mod.rs
pub mod normalize;
pub mod parse;

pub use normalize::normalize;
pub use parse::parse_table;

/// Values held by one column: raw cell text straight out of the parser, or
/// numbers after normalization. `None` is the missing-value marker for cells
/// that could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<String>),
    Numeric(Vec<Option<f64>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Column-major dataset assembled from one HTML table. Column order follows
/// header order; names are not deduplicated, so lookups resolve to the first
/// match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of accepted data rows. All columns are kept the same length.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }
}

/// Parse output plus the counters lenient ingestion would otherwise swallow.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub dataset: Dataset,
    /// First single-header row seen, if any.
    pub title: Option<String>,
    /// Data rows discarded because their cell count did not match the columns.
    pub dropped_rows: usize,
    /// Multi-header rows after the first, ignored under first-header-wins.
    pub ignored_header_rows: usize,
}
