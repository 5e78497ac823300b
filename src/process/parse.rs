// src/process/parse.rs
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::{Column, ColumnData, Dataset, ParseReport};
use crate::fetch::TableFragment;

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("tr selector should parse"));
static HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("th selector should parse"));
static DATA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("td selector should parse"));

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Classify each row of one table and assemble a rectangular dataset.
///
/// Row rules:
/// - exactly one `<th>`: table title, logged, never a column;
/// - more than one `<th>`: header row; the first such row fixes the column
///   set, later ones are ignored and counted;
/// - no `<th>`: candidate data row, accepted only when its `<td>` count
///   equals the column count, dropped and counted otherwise.
///
/// A table with no recognized header row parses to an empty dataset; no data
/// row is ever matched against zero columns.
pub fn parse_table(fragment: &TableFragment) -> ParseReport {
    let doc = Html::parse_document(&fragment.0);

    let mut names: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut report = ParseReport::default();

    for row in doc.select(&ROW_SELECTOR) {
        let headers: Vec<String> = row.select(&HEADER_SELECTOR).map(cell_text).collect();

        match headers.len() {
            1 => {
                let title = headers.into_iter().next().unwrap_or_default();
                info!(table = %title, "table title row");
                report.title.get_or_insert(title);
            }
            n if n > 1 => {
                if names.is_empty() {
                    names = headers;
                } else {
                    report.ignored_header_rows += 1;
                }
            }
            _ => {
                let data: Vec<String> = row.select(&DATA_SELECTOR).map(cell_text).collect();
                if names.is_empty() || data.len() != names.len() {
                    report.dropped_rows += 1;
                } else {
                    rows.push(data);
                }
            }
        }
    }

    if report.dropped_rows > 0 || report.ignored_header_rows > 0 {
        warn!(
            dropped_rows = report.dropped_rows,
            ignored_header_rows = report.ignored_header_rows,
            "lenient ingestion discarded rows"
        );
    }

    // Transpose accepted rows into columns; every accepted row already has
    // exactly names.len() cells.
    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column {
            name,
            data: ColumnData::Text(Vec::with_capacity(rows.len())),
        })
        .collect();
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row) {
            if let ColumnData::Text(values) = &mut column.data {
                values.push(value);
            }
        }
    }

    debug!(
        columns = columns.len(),
        rows = columns.first().map_or(0, |c| c.data.len()),
        "parsed table"
    );
    report.dataset = Dataset { columns };
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(html: &str) -> TableFragment {
        TableFragment(html.to_string())
    }

    #[test]
    fn header_row_plus_matching_data_rows() {
        let report = parse_table(&fragment(
            r#"<table>
                <tr><th>Year</th><th>Average Yield</th></tr>
                <tr><td>2020</td><td>0.25%</td></tr>
                <tr><td>2021</td><td>0.10%</td></tr>
            </table>"#,
        ));

        let ds = &report.dataset;
        assert_eq!(ds.columns.len(), 2);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.columns[0].name, "Year");
        assert_eq!(
            ds.column("Average Yield").unwrap().data,
            ColumnData::Text(vec!["0.25%".into(), "0.10%".into()])
        );
        assert_eq!(report.dropped_rows, 0);
    }

    #[test]
    fn mismatched_rows_are_dropped_and_counted() {
        let report = parse_table(&fragment(
            r#"<table>
                <tr><th>A</th><th>B</th></tr>
                <tr><td>1</td><td>2</td></tr>
                <tr><td>only one cell</td></tr>
                <tr><td>1</td><td>2</td><td>3</td></tr>
            </table>"#,
        ));

        assert_eq!(report.dataset.row_count(), 1);
        assert_eq!(report.dropped_rows, 2);
    }

    #[test]
    fn single_header_cell_is_a_title_not_a_column() {
        let report = parse_table(&fragment(
            r#"<table>
                <tr><th>Fed Funds Rate History</th></tr>
                <tr><th>Year</th><th>Yield</th></tr>
                <tr><td>2020</td><td>0.25%</td></tr>
            </table>"#,
        ));

        assert_eq!(report.title.as_deref(), Some("Fed Funds Rate History"));
        assert_eq!(report.dataset.columns.len(), 2);
        assert!(report.dataset.column("Fed Funds Rate History").is_none());
    }

    #[test]
    fn first_header_row_wins() {
        let report = parse_table(&fragment(
            r#"<table>
                <tr><th>Year</th><th>Yield</th></tr>
                <tr><td>2020</td><td>0.25%</td></tr>
                <tr><th>Other</th><th>Names</th></tr>
                <tr><td>2021</td><td>0.10%</td></tr>
            </table>"#,
        ));

        assert_eq!(report.ignored_header_rows, 1);
        assert_eq!(report.dataset.columns[0].name, "Year");
        assert_eq!(report.dataset.row_count(), 2);
    }

    #[test]
    fn no_header_row_means_empty_dataset() {
        let report = parse_table(&fragment(
            r#"<table>
                <tr><td>2020</td><td>0.25%</td></tr>
                <tr><td>2021</td><td>0.10%</td></tr>
            </table>"#,
        ));

        assert!(report.dataset.is_empty());
        assert_eq!(report.dataset.columns.len(), 0);
        assert_eq!(report.dropped_rows, 2);
    }

    #[test]
    fn duplicate_header_text_produces_duplicate_columns() {
        let report = parse_table(&fragment(
            r#"<table>
                <tr><th>Rate</th><th>Rate</th></tr>
                <tr><td>1.0</td><td>2.0</td></tr>
            </table>"#,
        ));

        assert_eq!(report.dataset.columns.len(), 2);
        assert_eq!(report.dataset.columns[0].name, "Rate");
        assert_eq!(report.dataset.columns[1].name, "Rate");
        // Lookup resolves to the first.
        assert_eq!(
            report.dataset.column("Rate").unwrap().data,
            ColumnData::Text(vec!["1.0".into()])
        );
    }

    #[test]
    fn cell_text_is_trimmed_and_concatenated() {
        let report = parse_table(&fragment(
            r#"<table>
                <tr><th>Name</th><th>Value</th></tr>
                <tr><td> <b>20</b>20 </td><td>
                    0.25%
                </td></tr>
            </table>"#,
        ));

        assert_eq!(
            report.dataset.column("Name").unwrap().data,
            ColumnData::Text(vec!["2020".into()])
        );
        assert_eq!(
            report.dataset.column("Value").unwrap().data,
            ColumnData::Text(vec!["0.25%".into()])
        );
    }
}
