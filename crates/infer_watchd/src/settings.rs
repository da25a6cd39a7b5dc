//! Effective configuration: config file, then environment overrides.

use infer_watch::config::WatchConfig;
use infer_watch::error::ConfigError;
use tracing::{info, warn};

use crate::paths::AppPaths;

/// Where a Flask dev server listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub const ENV_BASE_URL: &str = "INFER_WATCH_BASE_URL";
pub const ENV_LIVE_MS: &str = "INFER_WATCH_LIVE_MS";
pub const ENV_HISTORY_MS: &str = "INFER_WATCH_HISTORY_MS";

pub fn load(paths: &AppPaths) -> Result<WatchConfig, ConfigError> {
    let file = paths.config_file();
    let mut cfg = WatchConfig::load_from_file(&file)?;
    info!("Config: {:?}", file);

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    if cfg.base_url.trim().is_empty() {
        cfg.base_url = DEFAULT_BASE_URL.to_string();
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Invalid interval values are reported and ignored.
pub fn apply_env_overrides(cfg: &mut WatchConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup(ENV_BASE_URL) {
        cfg.base_url = v.trim().to_string();
    }

    let intervals = [
        (ENV_LIVE_MS, &mut cfg.live_interval_ms),
        (ENV_HISTORY_MS, &mut cfg.history_interval_ms),
    ];
    for (key, slot) in intervals {
        let Some(v) = lookup(key) else {
            continue;
        };
        match v.trim().parse::<u32>() {
            Ok(ms) if ms > 0 => *slot = ms,
            _ => warn!("Unknown {} value: {}", key, v),
        }
    }
}
