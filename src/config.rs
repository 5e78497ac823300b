// src/config.rs
use std::time::Duration;

/// Page carrying the rates table we chart.
pub static SOURCE_URL: &str = "https://www.macrotrends.net/2015/fed-funds-rate-historical-chart";

/// Columns pulled out of the normalized dataset for the chart axes.
pub static X_COLUMN: &str = "Year";
pub static Y_COLUMN: &str = "Average Yield";

pub static CHART_TITLE: &str = "Average Bond Yield";

/// The chart PNG is overwritten here on every request.
pub static CHART_PATH: &str = "static/yield.png";

pub static LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Single bounded fetch, no retries.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 600;
