//! Pure renderers from structured data to replacement node lists.
//!
//! Every function here returns the complete new children of a container; the
//! caller swaps them in wholesale, so no node or listener survives a render.

use crate::float_fmt::fmt_score;
use crate::markup::{Element, Node};
use crate::payload::HistoryItem;
use crate::prediction::{parse_prediction_text, PredictionRow};

pub const MSG_ESTABLISHING: &str = "Establishing connection...";
pub const MSG_AWAITING_ANALYSIS: &str = "Awaiting first image for analysis...";
pub const MSG_WAITING_FIRST_IMAGE: &str = "Waiting for the first image...";
pub const MSG_NO_PREDICTION: &str = "No prediction available.";
pub const MSG_FETCH_ERROR: &str = "Error fetching data. Please check server connection.";
pub const MSG_CONNECTION_RETRY: &str = "Connection error. Retrying...";
pub const MSG_IMAGE_ERROR: &str = "Error loading image. Retrying...";
pub const MSG_HISTORY_LOADING: &str = "Loading history...";
pub const MSG_HISTORY_EMPTY: &str = "No history yet. Images will appear here after processing...";
pub const MSG_HISTORY_ERROR: &str = "Error loading history.";
pub const MSG_HISTORY_NO_PREDICTION: &str = "No prediction";

/// `<p class="initial-message">…</p>`, used for every waiting/error state.
pub fn placeholder(msg: &str) -> Vec<Node> {
    vec![Element::new("p").class("initial-message").text(msg).into()]
}

pub fn prediction_list(rows: &[PredictionRow]) -> Vec<Node> {
    let mut ul = Element::new("ul");
    for row in rows {
        let li = match row {
            PredictionRow::Scored(p) => Element::new("li")
                .child(Element::new("span").class("prediction-label").text(&p.label))
                .child(
                    Element::new("span")
                        .class("prediction-score")
                        .text(fmt_score(p.score)),
                ),
            PredictionRow::Text(line) => Element::new("li").text(line),
        };
        ul = ul.child(li);
    }
    vec![ul.into()]
}

/// Contents of the live prediction panel for a fresh payload.
pub fn prediction_panel(prediction: Option<&str>) -> Vec<Node> {
    match prediction {
        Some(raw) => prediction_list(&parse_prediction_text(raw)),
        None => placeholder(MSG_NO_PREDICTION),
    }
}

pub fn history_item(item: &HistoryItem) -> Node {
    let image = Element::new("div").class("history-item-image-wrapper").child(
        Element::new("img")
            .class("history-item-image")
            .attr("src", &item.image_url)
            .attr("alt", "History Image"),
    );

    let top = match item.top_prediction() {
        Some(p) => Element::new("p")
            .class("history-prediction-label")
            .child(Element::new("span").text(&p.label))
            .child(
                Element::new("span")
                    .class("history-prediction-score")
                    .text(fmt_score(p.score)),
            ),
        None => Element::new("p")
            .class("history-prediction-label")
            .text(MSG_HISTORY_NO_PREDICTION),
    };

    let details = Element::new("div")
        .class("history-item-details")
        .child(
            Element::new("p")
                .class("history-timestamp")
                .text(&item.timestamp_formatted),
        )
        .child(top);

    Element::new("div")
        .class("history-item")
        .child(image)
        .child(details)
        .into()
}

pub fn history_panel(items: &[HistoryItem]) -> Vec<Node> {
    items.iter().map(history_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::nodes_to_html;
    use crate::payload::PredictionEntry;

    #[test]
    fn prediction_panel_renders_rows_in_order() {
        let nodes = prediction_panel(Some("Predictions:<br>1. cat (0.9)<br>oops"));
        assert_eq!(
            nodes_to_html(&nodes),
            "<ul><li><span class=\"prediction-label\">cat</span>\
             <span class=\"prediction-score\">0.9000</span></li><li>oops</li></ul>"
        );
    }

    #[test]
    fn missing_prediction_uses_placeholder() {
        let nodes = prediction_panel(None);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text_content(), MSG_NO_PREDICTION);
        assert!(nodes[0].find_by_class("initial-message").is_some());
    }

    #[test]
    fn history_item_shows_top_prediction_only() {
        let item = HistoryItem {
            image_url: "/static/images/image_0003.jpg?t=10".to_string(),
            timestamp_formatted: "2024-06-10 06:13:20".to_string(),
            predictions: vec![
                PredictionEntry::new("aspirin", 0.87654),
                PredictionEntry::new("ibuprofen", 0.1),
            ],
        };
        let node = history_item(&item);

        let img = node.find_by_class("history-item-image").unwrap();
        assert_eq!(img.get_attr("src"), Some("/static/images/image_0003.jpg?t=10"));
        assert_eq!(img.get_attr("alt"), Some("History Image"));

        let ts = node.find_by_class("history-timestamp").unwrap();
        assert_eq!(Node::from(ts.clone()).text_content(), "2024-06-10 06:13:20");

        let label = node.find_by_class("history-prediction-label").unwrap();
        assert_eq!(Node::from(label.clone()).text_content(), "aspirin0.8765");
        assert!(!node.text_content().contains("ibuprofen"));
    }

    #[test]
    fn history_item_without_predictions() {
        let item = HistoryItem {
            image_url: "/x.jpg".to_string(),
            timestamp_formatted: "t".to_string(),
            predictions: Vec::new(),
        };
        let node = history_item(&item);
        let label = node.find_by_class("history-prediction-label").unwrap();
        assert_eq!(
            Node::from(label.clone()).text_content(),
            MSG_HISTORY_NO_PREDICTION
        );
        assert!(node.find_by_class("history-prediction-score").is_none());
    }
}
