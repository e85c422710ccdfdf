//! Price Store - Shared Last-Known-Price Value
//!
//! The single piece of shared mutable state in the system. The reconnect
//! controller is the only writer; any number of tasks read concurrently.
//! Built on a `tokio::sync::watch` channel: reads are wait-free borrows that
//! observe either the old or the new value (never torn), and the expiry
//! watcher gets change notifications from the same primitive.

use tokio::sync::watch;
use tokio::time::Instant;

use crate::domain::PriceUpdate;

/// Thread-safe holder of the latest accepted [`PriceUpdate`].
#[derive(Debug)]
pub struct PriceStore {
    tx: watch::Sender<Option<PriceUpdate>>,
}

impl PriceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Accept `update` iff its timestamp is not older than the stored one.
    ///
    /// The guard and the write happen in one `send_if_modified` closure, so
    /// a late message from a connection being torn down can never overwrite
    /// a newer value from its replacement. Returns whether the update was
    /// accepted. Equal timestamps replace: the later-decoded message wins.
    pub fn update(&self, update: PriceUpdate) -> bool {
        self.tx.send_if_modified(|latest| match latest {
            Some(current) if update.received_at < current.received_at => false,
            _ => {
                *latest = Some(update);
                true
            }
        })
    }

    /// Refresh the stored timestamp without changing the value.
    ///
    /// Heartbeat path: the exchange vouches the feed is alive, so the
    /// current price keeps its freshness. No-op on an empty store and for
    /// instants older than the stored timestamp.
    pub fn touch(&self, now: Instant) -> bool {
        self.tx.send_if_modified(|latest| match latest.as_mut() {
            Some(current) if now >= current.received_at => {
                current.received_at = now;
                true
            }
            _ => false,
        })
    }

    /// The most recently accepted update, if any. Never blocks.
    pub fn latest(&self) -> Option<PriceUpdate> {
        *self.tx.borrow()
    }

    /// Watch for accepted changes (used by the expiry watcher).
    pub fn subscribe(&self) -> watch::Receiver<Option<PriceUpdate>> {
        self.tx.subscribe()
    }
}

impl Default for PriceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;

    fn update(value: rust_decimal::Decimal, at: Instant) -> PriceUpdate {
        PriceUpdate {
            value,
            received_at: at,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_store_reads_none() {
        let store = PriceStore::new();
        assert_eq!(store.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepts_first_update() {
        let store = PriceStore::new();
        let u = update(dec!(101.5), Instant::now());
        assert!(store.update(u));
        assert_eq!(store.latest(), Some(u));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_update_never_overwrites() {
        let store = PriceStore::new();
        let t0 = Instant::now();
        let newer = update(dec!(102), t0 + Duration::from_secs(2));
        let stale = update(dec!(99), t0);

        assert!(store.update(newer));
        assert!(!store.update(stale));
        assert_eq!(store.latest(), Some(newer));
    }

    #[tokio::test(start_paused = true)]
    async fn test_equal_timestamp_replaces() {
        let store = PriceStore::new();
        let t0 = Instant::now();
        assert!(store.update(update(dec!(100), t0)));
        assert!(store.update(update(dec!(100.1), t0)));
        assert_eq!(store.latest().unwrap().value, dec!(100.1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_refreshes_timestamp_only() {
        let store = PriceStore::new();
        let t0 = Instant::now();
        store.update(update(dec!(100), t0));

        let t1 = t0 + Duration::from_secs(5);
        assert!(store.touch(t1));

        let latest = store.latest().unwrap();
        assert_eq!(latest.value, dec!(100));
        assert_eq!(latest.received_at, t1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_on_empty_store_is_noop() {
        let store = PriceStore::new();
        assert!(!store.touch(Instant::now()));
        assert_eq!(store.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_accepted_updates() {
        let store = PriceStore::new();
        let mut rx = store.subscribe();
        store.update(update(dec!(100), Instant::now()));
        assert!(rx.has_changed().unwrap());
    }
}
