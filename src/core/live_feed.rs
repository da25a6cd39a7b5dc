//! Poller for the most recent inference result.

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::payload::LatestDataPayload;
use crate::render::{
    placeholder, prediction_panel, MSG_AWAITING_ANALYSIS, MSG_CONNECTION_RETRY, MSG_FETCH_ERROR,
    MSG_WAITING_FIRST_IMAGE,
};
use crate::sequence::{RequestSequencer, Ticket};
use crate::surface::Surface;
use crate::transport::Transport;

/// What one `/latest_data` response did to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveFeedOutcome {
    /// Image and predictions replaced; `last_timestamp` advanced.
    Rendered { timestamp: f64 },
    /// Payload was not newer than what is shown. Page untouched.
    Unchanged,
    /// Server has no image yet.
    AwaitingFirstImage,
    TransportFailed,
    /// A response to a later request was already applied. Page untouched.
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct LiveFeedPoller {
    last_timestamp: f64,
    sequencer: RequestSequencer,
}

impl LiveFeedPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_timestamp(&self) -> f64 {
        self.last_timestamp
    }

    /// Strictly newer than the last rendered payload.
    pub fn is_fresh(&self, timestamp: f64) -> bool {
        timestamp > self.last_timestamp
    }

    /// Take a ticket for a request about to be issued.
    pub fn begin(&mut self) -> Ticket {
        self.sequencer.issue()
    }

    pub fn apply(
        &mut self,
        ticket: Ticket,
        result: Result<LatestDataPayload, FetchError>,
        surface: &mut impl Surface,
    ) -> LiveFeedOutcome {
        if !self.sequencer.admit(ticket) {
            debug!(
                "Dropping overtaken /latest_data response #{} (already applied #{})",
                ticket.get(),
                self.sequencer.last_applied().map_or(0, Ticket::get)
            );
            return LiveFeedOutcome::Superseded;
        }

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                warn!("Error fetching latest data: {}", e);
                surface.set_predictions(placeholder(MSG_FETCH_ERROR));
                surface.set_status(MSG_CONNECTION_RETRY);
                surface.show_overlay();
                surface.set_image_visible(false);
                return LiveFeedOutcome::TransportFailed;
            }
        };

        let Some(image_url) = data.image_url() else {
            surface.set_status(MSG_WAITING_FIRST_IMAGE);
            surface.show_overlay();
            surface.set_image_visible(false);
            surface.set_predictions(placeholder(MSG_AWAITING_ANALYSIS));
            return LiveFeedOutcome::AwaitingFirstImage;
        };

        if !self.is_fresh(data.timestamp) {
            return LiveFeedOutcome::Unchanged;
        }

        debug!(
            timestamp = data.timestamp,
            filename = data.filename.as_deref().unwrap_or("-"),
            "New live data received. Updating."
        );
        surface.load_image(image_url);
        surface.set_predictions(prediction_panel(data.prediction()));
        self.last_timestamp = data.timestamp;

        LiveFeedOutcome::Rendered {
            timestamp: data.timestamp,
        }
    }

    /// One complete fetch-and-render cycle, for drivers that poll sequentially.
    pub async fn poll<T: Transport, S: Surface>(
        &mut self,
        transport: &T,
        url: &str,
        surface: &mut S,
    ) -> LiveFeedOutcome {
        let ticket = self.begin();
        let result = transport.get_json::<LatestDataPayload>(url).await;
        self.apply(ticket, result, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MSG_NO_PREDICTION;
    use crate::surface::MarkupSurface;

    fn payload(url: &str, prediction: Option<&str>, timestamp: f64) -> LatestDataPayload {
        LatestDataPayload {
            image_url: Some(url.to_string()),
            prediction: prediction.map(str::to_string),
            timestamp,
            ..LatestDataPayload::default()
        }
    }

    fn apply(
        p: &mut LiveFeedPoller,
        s: &mut MarkupSurface,
        r: Result<LatestDataPayload, FetchError>,
    ) -> LiveFeedOutcome {
        let t = p.begin();
        p.apply(t, r, s)
    }

    #[test]
    fn fresh_payload_updates_image_and_predictions() {
        let mut p = LiveFeedPoller::new();
        let mut s = MarkupSurface::new();

        let out = apply(
            &mut p,
            &mut s,
            Ok(payload("/img/1.jpg", Some("Predictions:<br>1. cat (0.9)"), 10.0)),
        );

        assert_eq!(out, LiveFeedOutcome::Rendered { timestamp: 10.0 });
        assert_eq!(p.last_timestamp(), 10.0);
        assert_eq!(s.image_src.as_deref(), Some("/img/1.jpg"));
        assert_eq!(s.predictions_text(), "cat0.9000");
    }

    #[test]
    fn stale_or_duplicate_payload_touches_nothing() {
        let mut p = LiveFeedPoller::new();
        let mut s = MarkupSurface::new();
        apply(&mut p, &mut s, Ok(payload("/img/1.jpg", None, 10.0)));
        let before = s.clone();

        let dup = apply(&mut p, &mut s, Ok(payload("/img/1.jpg", None, 10.0)));
        let older = apply(&mut p, &mut s, Ok(payload("/img/0.jpg", None, 9.5)));

        assert_eq!(dup, LiveFeedOutcome::Unchanged);
        assert_eq!(older, LiveFeedOutcome::Unchanged);
        assert_eq!(s, before);
        assert_eq!(p.last_timestamp(), 10.0);
    }

    #[test]
    fn first_payload_at_timestamp_zero_is_not_fresh() {
        let p = LiveFeedPoller::new();
        assert!(!p.is_fresh(0.0));
        assert!(p.is_fresh(0.001));
    }

    #[test]
    fn null_timestamp_is_never_fresh() {
        let mut p = LiveFeedPoller::new();
        let mut s = MarkupSurface::new();
        let before = s.clone();

        let data = crate::transport::decode_body(
            r#"{"image_url":"/img/1.jpg","prediction":null,"timestamp":null}"#,
        );
        let out = apply(&mut p, &mut s, data);

        assert_eq!(out, LiveFeedOutcome::Unchanged);
        assert_eq!(s, before);
    }

    #[test]
    fn missing_prediction_shows_placeholder() {
        let mut p = LiveFeedPoller::new();
        let mut s = MarkupSurface::new();
        apply(&mut p, &mut s, Ok(payload("/img/1.jpg", None, 1.0)));
        assert_eq!(s.predictions_text(), MSG_NO_PREDICTION);
    }

    #[test]
    fn no_image_yet_shows_waiting_state() {
        let mut p = LiveFeedPoller::new();
        let mut s = MarkupSurface::new();
        let data = LatestDataPayload {
            image_url: Some(String::new()),
            prediction: Some("Model ready".to_string()),
            timestamp: 0.0,
            ..LatestDataPayload::default()
        };

        let out = apply(&mut p, &mut s, Ok(data));

        assert_eq!(out, LiveFeedOutcome::AwaitingFirstImage);
        assert_eq!(s.status, MSG_WAITING_FIRST_IMAGE);
        assert!(s.overlay_visible);
        assert!(!s.image_visible);
        assert_eq!(s.predictions_text(), MSG_AWAITING_ANALYSIS);
        assert_eq!(p.last_timestamp(), 0.0);
    }

    #[test]
    fn failure_shows_error_and_does_not_poison_later_success() {
        let mut p = LiveFeedPoller::new();
        let mut s = MarkupSurface::new();
        apply(&mut p, &mut s, Ok(payload("/img/1.jpg", None, 5.0)));

        let out = apply(&mut p, &mut s, Err(FetchError::Status(503)));
        assert_eq!(out, LiveFeedOutcome::TransportFailed);
        assert_eq!(p.last_timestamp(), 5.0);
        assert_eq!(s.predictions_text(), MSG_FETCH_ERROR);
        assert_eq!(s.status, MSG_CONNECTION_RETRY);
        assert!(s.overlay_visible);

        let out = apply(&mut p, &mut s, Ok(payload("/img/2.jpg", None, 6.0)));
        assert_eq!(out, LiveFeedOutcome::Rendered { timestamp: 6.0 });
        assert_eq!(s.image_src.as_deref(), Some("/img/2.jpg"));
    }

    #[test]
    fn overtaken_response_is_ignored() {
        let mut p = LiveFeedPoller::new();
        let mut s = MarkupSurface::new();

        let slow = p.begin();
        let fast = p.begin();
        p.apply(fast, Ok(payload("/img/2.jpg", None, 2.0)), &mut s);
        let before = s.clone();

        // Even a failure from the older request must not clobber the page.
        let out = p.apply(slow, Err(FetchError::network("timed out")), &mut s);

        assert_eq!(out, LiveFeedOutcome::Superseded);
        assert_eq!(s, before);
    }
}
