// src/chart/mod.rs
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use tracing::debug;

use crate::config;
use crate::process::Dataset;

/// Pull the (x, y) pairs for the chart out of a normalized dataset, keeping
/// only rows where both values are present.
fn series(dataset: &Dataset, x_name: &str, y_name: &str) -> Result<Vec<(f64, f64)>> {
    let x = dataset
        .column(x_name)
        .with_context(|| format!("dataset has no column named {:?}", x_name))?
        .data
        .as_numeric()
        .ok_or_else(|| anyhow!("column {:?} was not normalized to numeric", x_name))?;
    let y = dataset
        .column(y_name)
        .with_context(|| format!("dataset has no column named {:?}", y_name))?
        .data
        .as_numeric()
        .ok_or_else(|| anyhow!("column {:?} was not normalized to numeric", y_name))?;

    Ok(x.iter()
        .zip(y.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect())
}

/// Render a line chart of `y_name` over `x_name` to a PNG at `out_path`.
pub fn render_line_chart(
    dataset: &Dataset,
    x_name: &str,
    y_name: &str,
    title: &str,
    out_path: &Path,
) -> Result<()> {
    let points = series(dataset, x_name, y_name)?;
    if points.is_empty() {
        return Err(anyhow!(
            "no plottable rows for {:?} vs {:?}",
            y_name,
            x_name
        ));
    }

    let (x_min, x_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
            (lo.min(*x), hi.max(*x))
        });
    let (y_min, y_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
            (lo.min(*y), hi.max(*y))
        });
    // Degenerate ranges (single point, flat series) still need some height.
    let x_pad = ((x_max - x_min) * 0.05).max(0.5);
    let y_pad = ((y_max - y_min) * 0.05).max(0.5);

    let root = BitMapBackend::new(out_path, (config::CHART_WIDTH, config::CHART_HEIGHT))
        .into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("filling chart background for {}", out_path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min - x_pad..x_max + x_pad, y_min - y_pad..y_max + y_pad)
        .context("building chart axes")?;

    chart
        .configure_mesh()
        .x_desc(x_name)
        .y_desc(format!("{} %", y_name))
        .draw()
        .context("drawing chart mesh")?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .context("drawing line series")?;

    root.present()
        .with_context(|| format!("writing chart to {}", out_path.display()))?;
    debug!(path = %out_path.display(), points = points.len(), "rendered chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{Column, ColumnData};
    use tempfile::tempdir;

    fn numeric_column(name: &str, values: Vec<Option<f64>>) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::Numeric(values),
        }
    }

    fn yield_dataset() -> Dataset {
        Dataset {
            columns: vec![
                numeric_column("Year", vec![Some(2020.0), Some(2021.0), Some(2022.0)]),
                numeric_column("Average Yield", vec![Some(0.25), None, Some(1.75)]),
            ],
        }
    }

    #[test]
    fn series_skips_rows_with_missing_values() {
        let points = series(&yield_dataset(), "Year", "Average Yield").unwrap();
        assert_eq!(points, vec![(2020.0, 0.25), (2022.0, 1.75)]);
    }

    #[test]
    fn missing_column_is_an_err() {
        assert!(series(&yield_dataset(), "Year", "Nope").is_err());
    }

    #[test]
    fn text_column_is_an_err() {
        let ds = Dataset {
            columns: vec![
                numeric_column("Year", vec![Some(2020.0)]),
                Column {
                    name: "Raw".to_string(),
                    data: ColumnData::Text(vec!["0.25%".to_string()]),
                },
            ],
        };
        assert!(series(&ds, "Year", "Raw").is_err());
    }

    #[test]
    fn renders_png_to_disk() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("chart.png");

        render_line_chart(&yield_dataset(), "Year", "Average Yield", "Yield", &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn empty_series_is_an_err() {
        let ds = Dataset {
            columns: vec![
                numeric_column("Year", vec![None]),
                numeric_column("Average Yield", vec![Some(0.25)]),
            ],
        };
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("chart.png");
        assert!(render_line_chart(&ds, "Year", "Average Yield", "Yield", &path).is_err());
    }
}
