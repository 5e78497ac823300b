// src/fetch/tables.rs
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

// Compiled once; the selector string is a constant, so parse cannot fail.
static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector should parse"));

/// One `<table>` element, materialized as an owned HTML fragment.
///
/// `scraper::Html` is not `Send`, so holding fragments (rather than element
/// references) is what lets the parse stage run on the blocking pool.
#[derive(Debug, Clone)]
pub struct TableFragment(pub String);

/// Fetch `url` and return every table element found, in document order.
///
/// One GET with the client's bounded timeout, no retries, no partial success:
/// any failure while fetching or reading the body surfaces as an `Err` with
/// context. An empty vec means the page parsed fine but had no tables.
pub async fn fetch_tables(client: &Client, url: &str) -> Result<Vec<TableFragment>> {
    let url = Url::parse(url).with_context(|| format!("parsing source URL {}", url))?;

    let html = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))?;

    let tables = extract_tables(&html);
    debug!(url = %url, count = tables.len(), "extracted tables");
    Ok(tables)
}

/// Pull every `<table>` out of already-fetched markup, in document order.
pub fn extract_tables(html: &str) -> Vec<TableFragment> {
    Html::parse_document(html)
        .select(&TABLE_SELECTOR)
        .map(|table| TableFragment(table.html()))
        .collect()
}
