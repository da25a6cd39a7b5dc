//! # infer_watch
//!
//! Client core for watching an image-classification server.
//!
//! Two independent pollers keep a page in sync with the server:
//!
//! - [`live_feed::LiveFeedPoller`] follows `GET /latest_data` (latest image +
//!   prediction text) and re-renders only when the payload timestamp advances.
//! - [`history::HistoryPoller`] follows `GET /history_data` (newest first) and
//!   rebuilds the history panel when the newest entry changes.
//!
//! Everything here is host-testable: rendering produces a [`markup::Node`]
//! tree, page effects go through the [`surface::Surface`] trait, and requests
//! go through [`transport::Transport`]. The browser build lives in
//! `infer_watch_web`; the headless watcher in `infer_watchd`.
//!
//! ## Quick Start
//!
//! ```
//! use infer_watch::prelude::*;
//!
//! let mut poller = LiveFeedPoller::new();
//! let mut page = MarkupSurface::new();
//! boot(&mut page);
//!
//! let ticket = poller.begin();
//! let body = r#"{"image_url":"/static/images/image_0001.jpg","prediction":"Predictions:<br>1. cat (0.9)","timestamp":12.5}"#;
//! let outcome = poller.apply(ticket, decode_body(body), &mut page);
//!
//! assert_eq!(outcome, LiveFeedOutcome::Rendered { timestamp: 12.5 });
//! assert_eq!(page.predictions_text(), "cat0.9000");
//! ```
//!
//! ## Modules
//!
//! - [`payload`]: wire shapes of both endpoints
//! - [`prediction`]: `"<n>. label (score)"` text parsing
//! - [`render`]: data → replacement node lists
//! - [`live_feed`], [`history`]: the pollers
//! - [`config`]: endpoints, periods, element ids

#[path = "core/config.rs"]
pub mod config;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/float_fmt.rs"]
pub mod float_fmt;

#[path = "core/history.rs"]
pub mod history;

#[path = "core/live_feed.rs"]
pub mod live_feed;

#[path = "core/markup.rs"]
pub mod markup;

#[path = "core/payload.rs"]
pub mod payload;

#[path = "core/prediction.rs"]
pub mod prediction;

#[path = "core/render.rs"]
pub mod render;

#[path = "core/sequence.rs"]
pub mod sequence;

#[path = "core/surface.rs"]
pub mod surface;

#[path = "core/transport.rs"]
pub mod transport;

/// Prelude module for convenient imports.
///
/// ```
/// use infer_watch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ElementIds, WatchConfig};
    pub use crate::error::{ConfigError, FetchError};
    pub use crate::history::{HistoryKey, HistoryOutcome, HistoryPoller};
    pub use crate::live_feed::{LiveFeedOutcome, LiveFeedPoller};
    pub use crate::markup::{Element, Node};
    pub use crate::payload::{HistoryItem, LatestDataPayload, PredictionEntry};
    pub use crate::prediction::{parse_prediction_text, PredictionRow};
    pub use crate::surface::{boot, image_failed, image_loaded, MarkupSurface, Surface};
    pub use crate::transport::{decode_body, Transport};
}
