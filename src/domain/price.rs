//! Price values and freshness evaluation.
//!
//! A `PriceUpdate` pairs a decimal price with the monotonic instant it was
//! accepted. Freshness is never cached: `freshness` recomputes it from the
//! stored timestamp and the caller's `now` on every query, so a price that
//! was fresh a moment ago goes stale without any background bookkeeping.

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::Instant;

/// A single accepted price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceUpdate {
    /// Last traded / quoted price.
    pub value: Decimal,
    /// Monotonic instant the update was accepted into the store.
    pub received_at: Instant,
}

impl PriceUpdate {
    /// Build an update stamped with the current instant.
    pub fn now(value: Decimal) -> Self {
        Self {
            value,
            received_at: Instant::now(),
        }
    }

    /// Elapsed time since this update was accepted.
    ///
    /// Saturates to zero if `now` predates the update (paused-clock tests
    /// can construct such orderings).
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.received_at)
    }
}

/// Outcome of a price query, qualified by freshness.
///
/// Queries never fail: a dead feed degrades to `Expired` (last known value
/// still attached) or `NeverReceived`, it does not raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceResult {
    /// A price within the expiry window.
    Fresh(PriceUpdate),
    /// The last known price, older than the expiry window.
    Expired(PriceUpdate),
    /// No update has ever been accepted.
    NeverReceived,
}

impl PriceResult {
    /// The price value, only if fresh.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Fresh(update) => Some(update.value),
            _ => None,
        }
    }

    /// The most recent update regardless of freshness.
    pub fn last_known(&self) -> Option<PriceUpdate> {
        match self {
            Self::Fresh(update) | Self::Expired(update) => Some(*update),
            Self::NeverReceived => None,
        }
    }

    /// True only for `Fresh`.
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

/// Evaluate freshness of the latest stored update at `now`.
///
/// Expired iff the elapsed time strictly exceeds `expiry`: an update whose
/// age equals the window exactly is still fresh. That boundary behavior is a
/// deliberate, documented choice, not configurable.
pub fn freshness(
    latest: Option<PriceUpdate>,
    now: Instant,
    expiry: Duration,
) -> PriceResult {
    match latest {
        None => PriceResult::NeverReceived,
        Some(update) if update.age(now) > expiry => PriceResult::Expired(update),
        Some(update) => PriceResult::Fresh(update),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const WINDOW: Duration = Duration::from_secs(30);

    fn update_at(at: Instant) -> PriceUpdate {
        PriceUpdate {
            value: dec!(42150.25),
            received_at: at,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_received() {
        let result = freshness(None, Instant::now(), WINDOW);
        assert_eq!(result, PriceResult::NeverReceived);
        assert_eq!(result.value(), None);
        assert_eq!(result.last_known(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_immediately_after_update() {
        let now = Instant::now();
        let update = update_at(now);
        let result = freshness(Some(update), now, WINDOW);
        assert_eq!(result, PriceResult::Fresh(update));
        assert_eq!(result.value(), Some(dec!(42150.25)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_boundary_equal_age_is_fresh() {
        let start = Instant::now();
        let update = update_at(start);
        let result = freshness(Some(update), start + WINDOW, WINDOW);
        assert!(result.is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_boundary_is_expired() {
        let start = Instant::now();
        let update = update_at(start);
        let at = start + WINDOW + Duration::from_millis(1);
        let result = freshness(Some(update), at, WINDOW);
        assert_eq!(result, PriceResult::Expired(update));
        // Last known value survives expiry; only `value()` goes away.
        assert_eq!(result.value(), None);
        assert_eq!(result.last_known(), Some(update));
    }

    #[tokio::test(start_paused = true)]
    async fn test_age_saturates_for_future_updates() {
        let now = Instant::now();
        let update = update_at(now + Duration::from_secs(5));
        assert_eq!(update.age(now), Duration::ZERO);
        assert!(freshness(Some(update), now, WINDOW).is_fresh());
    }
}
