//! Expiry Watcher - Edge-Triggered Freshness Notifications
//!
//! Emits one `PriceAvailable` when the stored price turns fresh and one
//! `PriceExpired` when it ages past the window. Notification plumbing only:
//! the lazy freshness computation in `domain::price` remains the source of
//! truth, and `price()` never consults this task.
//!
//! Event-driven: sleeps until the current update's expiry deadline or until
//! the store changes, whichever comes first. No fixed polling interval.

use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::domain::{freshness, FeedEvent, PriceUpdate};

/// Margin added past the deadline so the strict `>` boundary has elapsed
/// when the timer fires.
const DEADLINE_SLACK: Duration = Duration::from_millis(1);

/// Watches the store and broadcasts freshness transitions.
pub struct ExpiryWatcher {
    store_rx: watch::Receiver<Option<PriceUpdate>>,
    expiry: Duration,
    events: broadcast::Sender<FeedEvent>,
}

impl ExpiryWatcher {
    /// Build a watcher over the store's change channel.
    pub fn new(
        store_rx: watch::Receiver<Option<PriceUpdate>>,
        expiry: Duration,
        events: broadcast::Sender<FeedEvent>,
    ) -> Self {
        Self {
            store_rx,
            expiry,
            events,
        }
    }

    /// Run until shutdown fires or the store is gone.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        // Starts "not fresh" so the first accepted update emits
        // PriceAvailable, mirroring a feed coming up from cold.
        let mut was_fresh = false;

        loop {
            let latest = *self.store_rx.borrow_and_update();
            let fresh = freshness(latest, Instant::now(), self.expiry).is_fresh();

            if fresh && !was_fresh {
                info!("Price feed became available");
                let _ = self.events.send(FeedEvent::PriceAvailable);
            } else if !fresh && was_fresh {
                warn!(
                    expiry_seconds = self.expiry.as_secs(),
                    "Price feed has expired"
                );
                let _ = self.events.send(FeedEvent::PriceExpired);
            }
            was_fresh = fresh;

            if let Some(update) = latest.filter(|_| fresh) {
                let deadline = update.received_at + self.expiry + DEADLINE_SLACK;
                tokio::select! {
                    biased;
                    _ = shutdown.recv() => return,
                    changed = self.store_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            } else {
                // Nothing to time out; wait for the next accepted update.
                tokio::select! {
                    biased;
                    _ = shutdown.recv() => return,
                    changed = self.store_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}
