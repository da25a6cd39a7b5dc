//! Parsing of the delimited prediction text sent by `/latest_data`.
//!
//! The server sends a header line followed by ranked rows, joined by `<br>`:
//!
//! ```text
//! Predictions:<br>1. cat (0.9123)<br>2. dog (0.0456)
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::payload::PredictionEntry;

/// Line separator used inside the prediction string.
pub const LINE_BREAK: &str = "<br>";

/// One display row of the prediction panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionRow {
    Scored(PredictionEntry),
    /// A line that did not look like `<n>. <label> (<score>)`, shown verbatim.
    Text(String),
}

fn row_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]+\.\s*(.+?)\s*\(([0-9.]+)\)$").expect("prediction row pattern is valid")
    })
}

/// Split `raw` into display rows. Never fails; unrecognised lines become
/// [`PredictionRow::Text`].
pub fn parse_prediction_text(raw: &str) -> Vec<PredictionRow> {
    raw.split(LINE_BREAK)
        .filter(|line| !line.trim().is_empty())
        // Header ("Predictions:").
        .skip(1)
        .map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> PredictionRow {
    let Some(caps) = row_pattern().captures(line) else {
        return PredictionRow::Text(line.to_string());
    };
    // `[0-9.]+` also admits things like "1.2.3".
    match caps[2].parse::<f64>() {
        Ok(score) => PredictionRow::Scored(PredictionEntry::new(caps[1].trim(), score)),
        Err(_) => PredictionRow::Text(line.to_string()),
    }
}
