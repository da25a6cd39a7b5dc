//! Poller for the list of past inference results.
//!
//! Change detection only looks at the newest entry's formatted timestamp. That
//! misses edits to older entries, which is fine while the server only ever
//! prepends.

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::payload::HistoryItem;
use crate::render::{history_panel, placeholder, MSG_HISTORY_EMPTY, MSG_HISTORY_ERROR};
use crate::sequence::{RequestSequencer, Ticket};
use crate::surface::Surface;
use crate::transport::Transport;

/// Identity of the history snapshot currently on the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HistoryKey {
    /// Nothing rendered yet, or the history was empty.
    #[default]
    Initial,
    Snapshot(String),
}

impl HistoryKey {
    pub fn matches(&self, newest: &HistoryItem) -> bool {
        match self {
            HistoryKey::Initial => false,
            HistoryKey::Snapshot(k) => *k == newest.timestamp_formatted,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    /// Panel rebuilt from `items` entries.
    Rebuilt { items: usize },
    Unchanged,
    /// Server history is empty; key reset.
    Empty,
    TransportFailed,
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryPoller {
    last_key: HistoryKey,
    sequencer: RequestSequencer,
}

impl HistoryPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_key(&self) -> &HistoryKey {
        &self.last_key
    }

    pub fn has_changed(&self, items: &[HistoryItem]) -> bool {
        items.first().is_some_and(|newest| !self.last_key.matches(newest))
    }

    pub fn begin(&mut self) -> Ticket {
        self.sequencer.issue()
    }

    pub fn apply(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<HistoryItem>, FetchError>,
        surface: &mut impl Surface,
    ) -> HistoryOutcome {
        if !self.sequencer.admit(ticket) {
            debug!(
                "Dropping overtaken /history_data response #{} (already applied #{})",
                ticket.get(),
                self.sequencer.last_applied().map_or(0, Ticket::get)
            );
            return HistoryOutcome::Superseded;
        }

        let items = match result {
            Ok(items) => items,
            Err(e) => {
                warn!("Error fetching history data: {}", e);
                surface.set_history(placeholder(MSG_HISTORY_ERROR));
                return HistoryOutcome::TransportFailed;
            }
        };

        let Some(newest) = items.first() else {
            surface.set_history(placeholder(MSG_HISTORY_EMPTY));
            self.last_key = HistoryKey::Initial;
            return HistoryOutcome::Empty;
        };

        if !self.has_changed(&items) {
            return HistoryOutcome::Unchanged;
        }

        info!(
            entries = items.len(),
            newest = %newest.timestamp_formatted,
            "New history data received. Updating history display."
        );
        let key = HistoryKey::Snapshot(newest.timestamp_formatted.clone());
        surface.set_history(history_panel(&items));
        self.last_key = key;

        HistoryOutcome::Rebuilt { items: items.len() }
    }

    pub async fn poll<T: Transport, S: Surface>(
        &mut self,
        transport: &T,
        url: &str,
        surface: &mut S,
    ) -> HistoryOutcome {
        let ticket = self.begin();
        let result = transport.get_json::<Vec<HistoryItem>>(url).await;
        self.apply(ticket, result, surface)
    }
}
