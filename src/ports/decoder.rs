//! Message Decoder Port - Wire Messages into Feed Events
//!
//! Converts a raw transport message into something the reconnect controller
//! can act on. Decode failures are reported and skipped; they never tear
//! down the connection.

use rust_decimal::Decimal;
use thiserror::Error;

use super::transport::RawMessage;

/// What a successfully decoded message means to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A price observation.
    Price(Decimal),
    /// Feed liveness signal: refreshes the expiry clock, price unchanged.
    Heartbeat,
    /// Valid but irrelevant (subscription acks, unknown channels).
    Ignored,
}

/// A message the decoder could not make sense of.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not valid JSON for the expected schema.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The message parsed but carried an unusable price field.
    #[error("invalid price value: {0}")]
    BadPrice(String),
}

/// Schema knowledge for one exchange's feed.
pub trait MessageDecoder: Send + Sync + 'static {
    /// Decode a single raw message.
    fn decode(&self, raw: &RawMessage) -> Result<Decoded, DecodeError>;
}
