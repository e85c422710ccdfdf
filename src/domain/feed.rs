//! Feed lifecycle vocabulary: state, events, counters.
//!
//! `FeedState` is owned and mutated exclusively by the reconnect controller
//! and published through a watch channel. `FeedEvent` is the
//! error-observation surface: every absorbed failure and every freshness
//! transition shows up here instead of propagating to price queries.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Not yet started.
    Disconnected,
    /// A `connect()` attempt is in flight.
    Connecting,
    /// Subscribed and consuming messages.
    Connected,
    /// Waiting out a reconnect delay after a failure.
    Backoff,
    /// Terminal: `stop()` was called. No further transitions.
    Stopped,
}

impl std::fmt::Display for FeedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Backoff => write!(f, "backoff"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Observable lifecycle and freshness notifications.
///
/// Broadcast to any number of subscribers; carries rendered error text so
/// the events stay `Clone` and the transport error types stay out of the
/// public surface.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A connection was established and subscribed.
    Connected,
    /// A `connect()` attempt failed; the next one runs after `retry_in`.
    ConnectFailed {
        /// Rendered connect error.
        error: String,
        /// Backoff delay charged for this failure.
        retry_in: Duration,
    },
    /// An established connection died mid-stream.
    Disconnected {
        /// Rendered stream error.
        error: String,
        /// Backoff delay charged for this failure.
        retry_in: Duration,
    },
    /// The stored price transitioned from absent/expired to fresh.
    PriceAvailable,
    /// The stored price aged past the expiry window.
    PriceExpired,
}

/// Shared feed counters, written by the controller, read by anyone.
///
/// Plain atomics: these are observability values, not synchronization.
#[derive(Debug, Default)]
pub struct FeedStats {
    /// Whether a connection is currently established.
    pub connected: AtomicBool,
    /// Completed backoff cycles (connect failures + mid-stream drops).
    pub reconnects: AtomicU32,
    /// Raw messages received across all connections.
    pub messages: AtomicU64,
    /// Messages the decoder rejected.
    pub decode_failures: AtomicU64,
}

/// Point-in-time copy of [`FeedStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedStatsSnapshot {
    pub connected: bool,
    pub reconnects: u32,
    pub messages: u64,
    pub decode_failures: u64,
}

impl FeedStats {
    /// Snapshot all counters.
    pub fn snapshot(&self) -> FeedStatsSnapshot {
        FeedStatsSnapshot {
            connected: self.connected.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}
