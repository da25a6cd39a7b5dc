//! Timer inventory shared by the wasm client and host tests.
//!
//! Kept outside the wasm-only `web` module so the schedule can be unit-tested
//! on the host.

use infer_watch::config::WatchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerKind {
    LiveFeed,
    History,
}

impl PollerKind {
    pub fn label(self) -> &'static str {
        match self {
            PollerKind::LiveFeed => "live feed",
            PollerKind::History => "history",
        }
    }

    pub fn url(self, cfg: &WatchConfig) -> String {
        match self {
            PollerKind::LiveFeed => cfg.latest_url(),
            PollerKind::History => cfg.history_url(),
        }
    }

    pub fn interval_ms(self, cfg: &WatchConfig) -> u32 {
        match self {
            PollerKind::LiveFeed => cfg.live_interval_ms,
            PollerKind::History => cfg.history_interval_ms,
        }
    }

    /// Start order on page load: both run once immediately, live feed first.
    pub fn all() -> &'static [PollerKind] {
        &[PollerKind::LiveFeed, PollerKind::History]
    }
}

/// Id of the optional `<script type="application/json">` element carrying a
/// JSON [`WatchConfig`] for the page.
pub const CONFIG_ELEMENT_ID: &str = "infer-watch-config";

/// Parse the page-supplied config, falling back to the defaults when the page
/// carries none.
pub fn page_config(raw: Option<&str>) -> Result<WatchConfig, String> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => WatchConfig::from_json_str(raw).map_err(|e| e.to_string()),
        None => Ok(WatchConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_runs_at_half_the_live_feed_rate_by_default() {
        let cfg = WatchConfig::default();
        let live = PollerKind::LiveFeed.interval_ms(&cfg);
        let history = PollerKind::History.interval_ms(&cfg);
        assert_eq!(live, 2500);
        assert_eq!(history, 2 * live);
    }

    #[test]
    fn inventory_is_stable() {
        let all = PollerKind::all();
        assert_eq!(all, &[PollerKind::LiveFeed, PollerKind::History]);
        for k in all {
            assert!(!k.label().trim().is_empty());
        }
    }

    #[test]
    fn urls_follow_config() {
        let cfg = WatchConfig::default();
        assert_eq!(PollerKind::LiveFeed.url(&cfg), "/latest_data");
        assert_eq!(PollerKind::History.url(&cfg), "/history_data");
    }

    #[test]
    fn page_config_falls_back_to_defaults() {
        assert_eq!(page_config(None).unwrap(), WatchConfig::default());
        assert_eq!(page_config(Some("  \n")).unwrap(), WatchConfig::default());

        let cfg = page_config(Some(r#"{"live_interval_ms": 1000}"#)).unwrap();
        assert_eq!(cfg.live_interval_ms, 1000);

        assert!(page_config(Some("{not json")).is_err());
    }
}
