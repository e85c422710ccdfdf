//! Property-Based Tests — Feed Domain Invariants
//!
//! Uses `proptest` to verify that the freshness evaluation, the backoff
//! schedule, and the price store's monotonic guard hold across random
//! inputs, not just the hand-picked cases in the unit tests.

use std::time::Duration;

use proptest::prelude::*;
use rust_decimal::Decimal;
use tokio::time::Instant;

use price_feed_client::domain::{freshness, Backoff, PriceResult, PriceUpdate};
use price_feed_client::usecases::PriceStore;

// ── Freshness Properties ────────────────────────────────────

proptest! {
    /// Fresh iff the age does not strictly exceed the window.
    #[test]
    fn freshness_is_strict_greater_than_on_age(
        age_ms in 0u64..200_000,
        window_ms in 1u64..100_000,
    ) {
        let base = Instant::now();
        let update = PriceUpdate {
            value: Decimal::ONE,
            received_at: base,
        };
        let now = base + Duration::from_millis(age_ms);
        let result = freshness(Some(update), now, Duration::from_millis(window_ms));

        if age_ms > window_ms {
            prop_assert!(matches!(result, PriceResult::Expired(_)));
            prop_assert_eq!(result.value(), None);
        } else {
            prop_assert!(result.is_fresh());
            prop_assert_eq!(result.value(), Some(Decimal::ONE));
        }
        // The observation itself is never lost, only disqualified.
        prop_assert_eq!(result.last_known(), Some(update));
    }

    /// An empty store is NeverReceived at every point in time.
    #[test]
    fn freshness_of_empty_store_is_never_received(
        age_ms in 0u64..200_000,
        window_ms in 1u64..100_000,
    ) {
        let now = Instant::now() + Duration::from_millis(age_ms);
        let result = freshness(None, now, Duration::from_millis(window_ms));
        prop_assert_eq!(result, PriceResult::NeverReceived);
    }
}

// ── Backoff Properties ──────────────────────────────────────

proptest! {
    /// The schedule is exactly min·2^i clamped to max, for any bounds.
    #[test]
    fn backoff_doubles_to_the_cap(
        min_ms in 1u64..10_000,
        factor in 1u64..100,
        failures in 1usize..24,
    ) {
        let max_ms = min_ms * factor;
        let mut backoff = Backoff::new(
            Duration::from_millis(min_ms),
            Duration::from_millis(max_ms),
        );

        let mut expected = min_ms;
        for _ in 0..failures {
            let delay = backoff.next_delay();
            prop_assert_eq!(delay.as_millis() as u64, expected);
            prop_assert!(delay >= Duration::from_millis(min_ms));
            prop_assert!(delay <= Duration::from_millis(max_ms));
            expected = (expected * 2).min(max_ms);
        }
    }

    /// Reset always drops the very next delay back to the minimum.
    #[test]
    fn backoff_reset_restores_minimum(
        min_ms in 1u64..10_000,
        factor in 1u64..100,
        failures in 0usize..24,
    ) {
        let mut backoff = Backoff::new(
            Duration::from_millis(min_ms),
            Duration::from_millis(min_ms * factor),
        );
        for _ in 0..failures {
            backoff.next_delay();
        }
        backoff.reset();
        prop_assert_eq!(backoff.next_delay(), Duration::from_millis(min_ms));
    }
}

// ── Price Store Properties ──────────────────────────────────

proptest! {
    /// For any arrival order, the store holds the max timestamp seen so
    /// far, and out-of-order arrivals are rejected without effect.
    #[test]
    fn store_timestamp_is_monotonically_non_decreasing(
        offsets_ms in prop::collection::vec(0u64..600_000, 1..64),
    ) {
        let base = Instant::now();
        let store = PriceStore::new();
        let mut max_seen: Option<u64> = None;

        for (i, offset) in offsets_ms.iter().copied().enumerate() {
            let update = PriceUpdate {
                value: Decimal::from(i as u64),
                received_at: base + Duration::from_millis(offset),
            };
            let accepted = store.update(update);
            let expected_accept = max_seen.is_none_or(|m| offset >= m);
            prop_assert_eq!(accepted, expected_accept);

            if expected_accept {
                max_seen = Some(offset);
            }

            let stored = store.latest().unwrap();
            prop_assert_eq!(
                stored.received_at,
                base + Duration::from_millis(max_seen.unwrap())
            );
        }
    }

    /// touch() refreshes the timestamp monotonically and never the value.
    #[test]
    fn store_touch_never_moves_time_backwards(
        first_ms in 0u64..600_000,
        touch_ms in 0u64..600_000,
    ) {
        let base = Instant::now();
        let store = PriceStore::new();
        store.update(PriceUpdate {
            value: Decimal::TEN,
            received_at: base + Duration::from_millis(first_ms),
        });

        let touched = store.touch(base + Duration::from_millis(touch_ms));
        prop_assert_eq!(touched, touch_ms >= first_ms);

        let stored = store.latest().unwrap();
        prop_assert_eq!(stored.value, Decimal::TEN);
        prop_assert_eq!(
            stored.received_at,
            base + Duration::from_millis(first_ms.max(touch_ms))
        );
    }
}
