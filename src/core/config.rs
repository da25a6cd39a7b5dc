//! Client configuration: where to poll, how often, and which page elements to
//! write to. Every field has a default, so an empty JSON object is a valid
//! config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Origin of the server. Empty means "same origin" (browser build).
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_latest_path")]
    pub latest_path: String,
    #[serde(default = "default_history_path")]
    pub history_path: String,
    #[serde(default = "default_live_interval_ms")]
    pub live_interval_ms: u32,
    #[serde(default = "default_history_interval_ms")]
    pub history_interval_ms: u32,
    #[serde(default)]
    pub elements: ElementIds,
}

/// Ids of the page elements the browser build attaches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub image: String,
    pub predictions: String,
    pub overlay: String,
    pub status: String,
    pub history: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            image: "camera-image".to_string(),
            predictions: "prediction-results".to_string(),
            overlay: "loading-overlay".to_string(),
            status: "loading-status".to_string(),
            history: "history-container".to_string(),
        }
    }
}

fn default_latest_path() -> String {
    "/latest_data".to_string()
}

fn default_history_path() -> String {
    "/history_data".to_string()
}

fn default_live_interval_ms() -> u32 {
    2500
}

fn default_history_interval_ms() -> u32 {
    5000
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            latest_path: default_latest_path(),
            history_path: default_history_path(),
            live_interval_ms: default_live_interval_ms(),
            history_interval_ms: default_history_interval_ms(),
            elements: ElementIds::default(),
        }
    }
}

impl WatchConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: WatchConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_json_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.live_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "live_interval_ms must be > 0".to_string(),
            ));
        }
        if self.history_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "history_interval_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn latest_url(&self) -> String {
        self.resolve_url(&self.latest_path)
    }

    pub fn history_url(&self) -> String {
        self.resolve_url(&self.history_path)
    }

    /// Resolve a server-relative path (as found in `image_url`) against
    /// `base_url`. Absolute URLs are returned as-is.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = WatchConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, WatchConfig::default());
        assert_eq!(cfg.live_interval_ms, 2500);
        assert_eq!(cfg.history_interval_ms, 5000);
        assert_eq!(cfg.elements.image, "camera-image");
        assert_eq!(cfg.latest_url(), "/latest_data");
    }

    #[test]
    fn partial_element_ids_keep_other_defaults() {
        let cfg = WatchConfig::from_json_str(r#"{"elements": {"history": "past"}}"#).unwrap();
        assert_eq!(cfg.elements.history, "past");
        assert_eq!(cfg.elements.overlay, "loading-overlay");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = WatchConfig::from_json_str(r#"{"live_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn urls_join_with_single_slash() {
        let cfg = WatchConfig {
            base_url: "http://192.168.1.20:5000/".to_string(),
            ..WatchConfig::default()
        };
        assert_eq!(cfg.history_url(), "http://192.168.1.20:5000/history_data");
        assert_eq!(
            cfg.resolve_url("/static/images/image_0001.jpg?t=5"),
            "http://192.168.1.20:5000/static/images/image_0001.jpg?t=5"
        );
        assert_eq!(cfg.resolve_url("x.jpg"), "http://192.168.1.20:5000/x.jpg");
        assert_eq!(cfg.resolve_url("https://cdn/x.jpg"), "https://cdn/x.jpg");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = WatchConfig::load_from_file(Path::new("/nonexistent/infer_watch/config.json"))
            .unwrap();
        assert_eq!(cfg, WatchConfig::default());
    }
}
