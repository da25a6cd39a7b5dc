//! Wire shapes of the two polled endpoints.
//!
//! These types are consumed, never produced, by the client. Unknown fields are
//! ignored so the server can add fields without breaking older pages.

use serde::{Deserialize, Serialize};

/// Body of `GET /latest_data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatestDataPayload {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prediction: Option<String>,
    /// `null` reads as 0, which is never fresh.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub timestamp: f64,
    /// Server-formatted capture time ("N/A" before the first upload).
    #[serde(default)]
    pub timestamp_formatted: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl LatestDataPayload {
    /// The image URL, or `None` while the server has no image yet.
    ///
    /// The server reports "no image" both as `null` and as an empty string.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn prediction(&self) -> Option<&str> {
        self.prediction.as_deref().filter(|p| !p.is_empty())
    }
}

/// One ranked class of a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEntry {
    pub label: String,
    pub score: f64,
    /// Class index reported by the server; not used for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl PredictionEntry {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
            index: None,
        }
    }
}

/// One element of the `GET /history_data` array (newest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub image_url: String,
    pub timestamp_formatted: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub predictions: Vec<PredictionEntry>,
}

impl HistoryItem {
    /// The first prediction is treated as the best one; server order is trusted.
    pub fn top_prediction(&self) -> Option<&PredictionEntry> {
        self.predictions.first()
    }
}

fn null_as_empty<'de, D>(de: D) -> Result<Vec<PredictionEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<PredictionEntry>>::deserialize(de)?.unwrap_or_default())
}

fn null_as_zero<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_payload_accepts_server_shape() {
        let raw = r#"{
            "image_url": "/static/images/image_0007.jpg?t=1718000000",
            "prediction": "Prediksi:<br>1. aspirin (0.9123)",
            "timestamp": 1718000000.25,
            "timestamp_formatted": "2024-06-10 06:13:20",
            "filename": "image_0007.jpg"
        }"#;
        let p: LatestDataPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(
            p.image_url(),
            Some("/static/images/image_0007.jpg?t=1718000000")
        );
        assert_eq!(p.timestamp, 1718000000.25);
        assert_eq!(p.filename.as_deref(), Some("image_0007.jpg"));
    }

    #[test]
    fn empty_image_url_means_no_image() {
        let raw = r#"{"image_url": "", "prediction": "Model ready", "timestamp": 0}"#;
        let p: LatestDataPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(p.image_url(), None);

        let raw = r#"{"image_url": null, "prediction": null, "timestamp": 0}"#;
        let p: LatestDataPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(p.image_url(), None);
        assert_eq!(p.prediction(), None);
    }

    #[test]
    fn null_timestamp_reads_as_zero() {
        let raw = r#"{"image_url": "/a.jpg", "prediction": null, "timestamp": null}"#;
        let p: LatestDataPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(p.timestamp, 0.0);

        let p: LatestDataPayload = serde_json::from_str(r#"{"image_url": "/a.jpg"}"#).unwrap();
        assert_eq!(p.timestamp, 0.0);
    }

    #[test]
    fn history_item_tolerates_null_predictions() {
        let raw = r#"[
            {"image_url": "/a.jpg", "timestamp_formatted": "2024-06-10 06:13:20",
             "predictions": [{"index": 3, "label": "paracetamol", "score": 0.8}]},
            {"image_url": "/b.jpg", "timestamp_formatted": "2024-06-10 06:13:10",
             "predictions": null}
        ]"#;
        let items: Vec<HistoryItem> = serde_json::from_str(raw).unwrap();
        assert_eq!(items.len(), 2);
        let top = items[0].top_prediction().unwrap();
        assert_eq!(top.label, "paracetamol");
        assert_eq!(top.index, Some(3));
        assert!(items[1].top_prediction().is_none());
    }
}
