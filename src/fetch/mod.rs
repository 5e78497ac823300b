// src/fetch/mod.rs
use anyhow::Result;
use reqwest::Client;

use crate::config;

pub mod tables;

pub use tables::{extract_tables, fetch_tables, TableFragment};

/// Build the process-wide HTTP client with the bounded fetch timeout.
pub fn http_client() -> Result<Client> {
    let client = Client::builder().timeout(config::FETCH_TIMEOUT).build()?;
    Ok(client)
}
