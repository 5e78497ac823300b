use anyhow::{Context, Result};
use ratechart::{config, fetch, server};
use std::{fs, path::Path};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) prepare output dir + shared client ───────────────────────
    if let Some(dir) = Path::new(config::CHART_PATH).parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating chart output dir {}", dir.display()))?;
    }
    let client = fetch::http_client()?;

    // ─── 3) serve ────────────────────────────────────────────────────
    let app = server::create_router(server::AppState::new(client));
    let listener = tokio::net::TcpListener::bind(config::LISTEN_ADDR)
        .await
        .with_context(|| format!("binding {}", config::LISTEN_ADDR))?;
    info!(addr = config::LISTEN_ADDR, source = config::SOURCE_URL, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
