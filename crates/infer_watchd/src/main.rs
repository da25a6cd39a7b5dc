//! Infer Watch Daemon - headless watcher for an inference server
//!
//! Polls the same two endpoints as the browser page:
//! - `/latest_data` every `live_interval_ms` (latest image + predictions)
//! - `/history_data` every `history_interval_ms` (newest-first history)
//!
//! and logs every panel change. Configuration:
//! - Linux: ~/.config/infer_watch/config.json
//! - Windows: %APPDATA%\infer_watch\config.json
//! - MacOS: ~/Library/Application Support/infer_watch/config.json
//!
//! Environment overrides: `INFER_WATCH_BASE_URL`, `INFER_WATCH_LIVE_MS`,
//! `INFER_WATCH_HISTORY_MS`. Log level: `RUST_LOG` (default `info`).

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod http;
mod paths;
mod settings;
mod watcher;

use http::HttpTransport;
use paths::AppPaths;
use watcher::Watcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let paths = AppPaths::new()?;
    let cfg = settings::load(&paths)?;
    info!(
        "Watching {} (live feed every {} ms, history every {} ms)",
        cfg.base_url, cfg.live_interval_ms, cfg.history_interval_ms
    );

    let watcher = Arc::new(Watcher::new(cfg, HttpTransport::new()?));

    // Independent loops; neither waits on the other.
    tokio::select! {
        _ = Arc::clone(&watcher).run_live_feed() => {}
        _ = Arc::clone(&watcher).run_history() => {}
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!("Ctrl-C handler failed: {}", e),
        },
    }

    Ok(())
}
