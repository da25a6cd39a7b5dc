//! The two polling loops of the headless watcher.
//!
//! Each loop has its own poller; the rendered page is shared. Panel changes are
//! reported through `tracing` instead of being drawn.

use std::sync::Arc;
use std::time::Duration;

use infer_watch::prelude::*;
use tokio::sync::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::http::HttpTransport;

pub struct Watcher {
    cfg: WatchConfig,
    transport: HttpTransport,
    live: Mutex<LiveFeedPoller>,
    history: Mutex<HistoryPoller>,
    page: Mutex<MarkupSurface>,
}

// Lock order: poller, then page. Neither is held across a request.
impl Watcher {
    pub fn new(cfg: WatchConfig, transport: HttpTransport) -> Self {
        let mut page = MarkupSurface::new();
        boot(&mut page);
        Self {
            cfg,
            transport,
            live: Mutex::new(LiveFeedPoller::new()),
            history: Mutex::new(HistoryPoller::new()),
            page: Mutex::new(page),
        }
    }

    pub async fn live_cycle(&self) -> LiveFeedOutcome {
        let ticket = self.live.lock().await.begin();
        let result = self
            .transport
            .fetch_json::<LatestDataPayload>(&self.cfg.latest_url())
            .await;
        let (filename, captured) = match &result {
            Ok(p) => (p.filename.clone(), p.timestamp_formatted.clone()),
            Err(_) => (None, None),
        };

        let mut poller = self.live.lock().await;
        let mut page = self.page.lock().await;
        let outcome = poller.apply(ticket, result, &mut *page);
        drop(poller);
        match &outcome {
            LiveFeedOutcome::Rendered { timestamp } => {
                info!(
                    timestamp = *timestamp,
                    file = filename.as_deref().unwrap_or("-"),
                    captured = captured.as_deref().unwrap_or("-"),
                    "Live feed: {}",
                    page.predictions_text()
                );
                debug!("prediction panel: {}", page.predictions_html());
            }
            LiveFeedOutcome::AwaitingFirstImage => debug!("Live feed: waiting for the first image"),
            LiveFeedOutcome::Unchanged | LiveFeedOutcome::Superseded => {}
            LiveFeedOutcome::TransportFailed => debug!("Live feed: {}", page.status),
        }
        outcome
    }

    /// Stand-in for the browser's image load: download `src` and report the
    /// result to the page, unless a newer image replaced it meanwhile.
    pub async fn verify_image(&self, src: String) {
        let url = self.cfg.resolve_url(&src);
        let result = self.transport.fetch_image(&url).await;

        let mut page = self.page.lock().await;
        if page.image_src.as_deref() != Some(src.as_str()) {
            return;
        }
        match result {
            Ok(bytes) => {
                debug!(bytes, "Image loaded: {}", src);
                image_loaded(&mut *page);
            }
            Err(e) => {
                warn!("Image {}: {}", src, e);
                image_failed(&mut *page, &src);
            }
        }
    }

    pub async fn history_cycle(&self) -> HistoryOutcome {
        let ticket = self.history.lock().await.begin();
        let result = self
            .transport
            .fetch_json::<Vec<HistoryItem>>(&self.cfg.history_url())
            .await;

        let mut poller = self.history.lock().await;
        let mut page = self.page.lock().await;
        let outcome = poller.apply(ticket, result, &mut *page);
        drop(poller);
        match &outcome {
            HistoryOutcome::Rebuilt { items } => {
                if let Some(newest) = page.history.first() {
                    info!(items = *items, "History: {}", newest.text_content());
                }
                debug!("history panel: {}", page.history_html());
            }
            HistoryOutcome::Empty => debug!("History: empty"),
            HistoryOutcome::Unchanged
            | HistoryOutcome::Superseded
            | HistoryOutcome::TransportFailed => {}
        }
        outcome
    }

    /// One live feed tick: fetch, apply, then load the new image if any.
    async fn live_tick(&self) {
        if let LiveFeedOutcome::Rendered { .. } = self.live_cycle().await {
            let src = self.page.lock().await.image_src.clone();
            if let Some(src) = src {
                self.verify_image(src).await;
            }
        }
    }

    /// Every tick starts its own request; a slow one does not hold back the
    /// next. Overtaken responses are dropped by the poller.
    pub async fn run_live_feed(self: Arc<Self>) {
        let mut ticker = ticker(self.cfg.live_interval_ms);
        loop {
            ticker.tick().await;
            let watcher = Arc::clone(&self);
            tokio::spawn(async move { watcher.live_tick().await });
        }
    }

    pub async fn run_history(self: Arc<Self>) {
        let mut ticker = ticker(self.cfg.history_interval_ms);
        loop {
            ticker.tick().await;
            let watcher = Arc::clone(&self);
            tokio::spawn(async move {
                watcher.history_cycle().await;
            });
        }
    }
}

/// First tick completes immediately, matching the run-once-on-load behavior.
fn ticker(ms: u32) -> time::Interval {
    let mut t = time::interval(Duration::from_millis(u64::from(ms)));
    t.set_missed_tick_behavior(MissedTickBehavior::Delay);
    t
}
