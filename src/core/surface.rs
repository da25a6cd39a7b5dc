//! The page regions the pollers write to.
//!
//! The browser build implements [`Surface`] over real elements looked up by id;
//! [`MarkupSurface`] keeps everything in memory for the headless watcher and
//! for tests.

use tracing::warn;

use crate::markup::{nodes_to_html, Node};
use crate::render::{
    placeholder, MSG_AWAITING_ANALYSIS, MSG_ESTABLISHING, MSG_HISTORY_LOADING, MSG_IMAGE_ERROR,
};

pub trait Surface {
    /// Replace all children of the prediction panel.
    fn set_predictions(&mut self, nodes: Vec<Node>);
    /// Replace all children of the history panel.
    fn set_history(&mut self, nodes: Vec<Node>);
    /// Text of the status line inside the loading overlay.
    fn set_status(&mut self, text: &str);
    fn show_overlay(&mut self);
    fn hide_overlay(&mut self);
    /// Fade the live image in (`true`) or hide it (`false`).
    fn set_image_visible(&mut self, visible: bool);
    /// Point the live image at `url`. The outcome is reported later through
    /// [`image_loaded`] or [`image_failed`].
    fn load_image(&mut self, url: &str);
}

/// Page state before the first response arrives.
pub fn boot(surface: &mut impl Surface) {
    surface.show_overlay();
    surface.set_status(MSG_ESTABLISHING);
    surface.set_predictions(placeholder(MSG_AWAITING_ANALYSIS));
    surface.set_history(placeholder(MSG_HISTORY_LOADING));
}

pub fn image_loaded(surface: &mut impl Surface) {
    surface.set_image_visible(true);
    surface.hide_overlay();
}

pub fn image_failed(surface: &mut impl Surface, url: &str) {
    warn!("Failed to load image: {}", url);
    surface.set_status(MSG_IMAGE_ERROR);
    surface.show_overlay();
    surface.set_image_visible(false);
}

/// In-memory surface.
///
/// `mutations` counts every call, so callers can assert that a no-op poll
/// really left the page alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupSurface {
    pub predictions: Vec<Node>,
    pub history: Vec<Node>,
    pub status: String,
    pub overlay_visible: bool,
    pub image_visible: bool,
    pub image_src: Option<String>,
    pub mutations: u64,
}

impl MarkupSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predictions_html(&self) -> String {
        nodes_to_html(&self.predictions)
    }

    pub fn history_html(&self) -> String {
        nodes_to_html(&self.history)
    }

    pub fn predictions_text(&self) -> String {
        self.predictions.iter().map(Node::text_content).collect()
    }

    pub fn history_text(&self) -> String {
        self.history.iter().map(Node::text_content).collect()
    }
}

impl Surface for MarkupSurface {
    fn set_predictions(&mut self, nodes: Vec<Node>) {
        self.predictions = nodes;
        self.mutations += 1;
    }

    fn set_history(&mut self, nodes: Vec<Node>) {
        self.history = nodes;
        self.mutations += 1;
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
        self.mutations += 1;
    }

    fn show_overlay(&mut self) {
        self.overlay_visible = true;
        self.mutations += 1;
    }

    fn hide_overlay(&mut self) {
        self.overlay_visible = false;
        self.mutations += 1;
    }

    fn set_image_visible(&mut self, visible: bool) {
        self.image_visible = visible;
        self.mutations += 1;
    }

    fn load_image(&mut self, url: &str) {
        self.image_src = Some(url.to_string());
        self.mutations += 1;
    }
}
