// src/server/mod.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::task;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config;
use crate::fetch::{self, TableFragment};
use crate::process::{normalize, parse_table};
use crate::{chart, process};

#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub source_url: String,
    pub chart_path: PathBuf,
}

impl AppState {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            source_url: config::SOURCE_URL.to_string(),
            chart_path: PathBuf::from(config::CHART_PATH),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chart_page))
        .route("/chart.png", get(chart_image))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Locator → Parser → Normalizer → renderer, one run per request. Parsing and
/// rendering are CPU-bound, so they run on the blocking pool.
async fn run_pipeline(state: &AppState) -> Result<String> {
    let tables = fetch::fetch_tables(&state.client, &state.source_url).await?;
    let first: TableFragment = tables
        .into_iter()
        .next()
        .with_context(|| format!("no tables found at {}", state.source_url))?;

    let chart_path = state.chart_path.clone();
    let title = task::spawn_blocking(move || -> Result<String> {
        let report = parse_table(&first);
        let dataset: process::Dataset = normalize(report.dataset);
        let title = report
            .title
            .unwrap_or_else(|| config::CHART_TITLE.to_string());
        chart::render_line_chart(
            &dataset,
            config::X_COLUMN,
            config::Y_COLUMN,
            &title,
            &chart_path,
        )?;
        Ok(title)
    })
    .await??;

    info!(title = %title, "chart rendered");
    Ok(render_page(&title))
}

fn render_page(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n\
         <h1>{title}</h1>\n<img src=\"/chart.png\" alt=\"{title}\" />\n</body>\n</html>\n"
    )
}

async fn chart_page(State(state): State<AppState>) -> Response {
    match run_pipeline(&state).await {
        Ok(page) => Html(page).into_response(),
        Err(err) => {
            error!("pipeline failed: {:#}", err);
            (
                StatusCode::BAD_GATEWAY,
                "could not build the chart from the source page",
            )
                .into_response()
        }
    }
}

async fn chart_image(State(state): State<AppState>) -> Response {
    match tokio::fs::read(&state.chart_path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(err) => {
            warn!(path = %state.chart_path.display(), "chart image unavailable: {}", err);
            (StatusCode::NOT_FOUND, "chart not rendered yet").into_response()
        }
    }
}
