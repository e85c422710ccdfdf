//! Feed Transport Port - Streaming Exchange Connection Interface
//!
//! Defines the traits for opening a duplex streaming connection to an
//! exchange endpoint and pulling raw messages off it. The reconnect
//! controller consumes these traits and never sees transport details;
//! adapters (WebSocket, fakes in tests) implement them.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A raw wire message, opaque to the core.
///
/// The transport yields these; only the decoder knows the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage(pub String);

impl RawMessage {
    /// Borrow the payload text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawMessage {
    fn from(payload: String) -> Self {
        Self(payload)
    }
}

impl From<&str> for RawMessage {
    fn from(payload: &str) -> Self {
        Self(payload.to_string())
    }
}

/// Transport-level failures.
///
/// All variants are absorbed by the reconnect controller and retried with
/// backoff; none of them ever reaches a price query.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The endpoint was unreachable or refused the connection/subscription.
    #[error("connect failed: {0}")]
    Connect(String),

    /// An established connection dropped mid-stream.
    #[error("stream closed: {0}")]
    StreamClosed(String),

    /// No message arrived within the read timeout. Treated as a dead
    /// connection, not as price expiry; the two signals are independent.
    #[error("no message within {0:?}")]
    Timeout(Duration),
}

/// Factory for streaming connections to one exchange endpoint.
///
/// Owned by the reconnect controller for the client's lifetime; `connect`
/// is called once per reconnect cycle. Sending the subscription request is
/// part of establishing the connection.
#[async_trait]
pub trait FeedTransport: Send + Sync + 'static {
    /// The connection type this transport produces.
    type Conn: FeedConnection;

    /// Open a connection and subscribe.
    ///
    /// Must be cancel-safe: the controller drops the future when `stop()`
    /// interrupts an attempt in flight.
    async fn connect(&self) -> Result<Self::Conn, TransportError>;
}

/// An established streaming connection.
#[async_trait]
pub trait FeedConnection: Send {
    /// Pull the next raw message, waiting at most `timeout`.
    ///
    /// `Timeout` and `StreamClosed` both end the session; the controller
    /// tears the connection down and backs off either way.
    async fn next_message(&mut self, timeout: Duration) -> Result<RawMessage, TransportError>;

    /// Close the connection. Best effort; errors are discarded.
    async fn close(&mut self);
}
