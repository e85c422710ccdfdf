//! Ticker Decoder - Exchange Ticker/Heartbeat JSON Schema
//!
//! Decodes the classic exchange feed shape: JSON objects dispatched on a
//! `type` field. Tickers carry the price as a string; heartbeats vouch for
//! feed liveness without a price; subscription acks are ignored. Unknown
//! types are logged and skipped so schema additions upstream never take the
//! feed down.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::ports::{DecodeError, Decoded, MessageDecoder, RawMessage};

/// Raw feed message envelope. Only the fields the feed cares about.
#[derive(Debug, Deserialize)]
struct TickerMsg {
    /// Message discriminator ("ticker", "heartbeat", ...).
    #[serde(rename = "type")]
    kind: String,
    /// Price as a decimal string, present on ticker messages.
    #[serde(default)]
    price: Option<String>,
}

/// Decoder for ticker/heartbeat feeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickerDecoder;

impl TickerDecoder {
    /// Plain constructor, for symmetry with the other adapters.
    pub fn new() -> Self {
        Self
    }
}

impl MessageDecoder for TickerDecoder {
    fn decode(&self, raw: &RawMessage) -> Result<Decoded, DecodeError> {
        let msg: TickerMsg = serde_json::from_str(raw.as_str())?;

        match msg.kind.as_str() {
            "ticker" => {
                let text = msg
                    .price
                    .ok_or_else(|| DecodeError::BadPrice("ticker without price".to_string()))?;
                let value = Decimal::from_str(&text)
                    .map_err(|e| DecodeError::BadPrice(format!("{text:?}: {e}")))?;
                Ok(Decoded::Price(value))
            }
            "heartbeat" => Ok(Decoded::Heartbeat),
            "subscriptions" => Ok(Decoded::Ignored),
            other => {
                warn!(kind = other, "Unknown feed message type");
                Ok(Decoded::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn decode(payload: &str) -> Result<Decoded, DecodeError> {
        TickerDecoder::new().decode(&RawMessage::from(payload))
    }

    #[test]
    fn test_ticker_price_decoded() {
        let decoded = decode(r#"{"type":"ticker","product_id":"ETH-USD","price":"2531.21"}"#);
        assert_eq!(decoded.unwrap(), Decoded::Price(dec!(2531.21)));
    }

    #[test]
    fn test_heartbeat_decoded() {
        let decoded = decode(r#"{"type":"heartbeat","sequence":90}"#);
        assert_eq!(decoded.unwrap(), Decoded::Heartbeat);
    }

    #[test]
    fn test_subscription_ack_ignored() {
        let decoded = decode(r#"{"type":"subscriptions","channels":[]}"#);
        assert_eq!(decoded.unwrap(), Decoded::Ignored);
    }

    #[test]
    fn test_unknown_type_ignored() {
        let decoded = decode(r#"{"type":"l2update","changes":[]}"#);
        assert_eq!(decoded.unwrap(), Decoded::Ignored);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            decode("not json at all"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_ticker_without_price_rejected() {
        assert!(matches!(
            decode(r#"{"type":"ticker","product_id":"ETH-USD"}"#),
            Err(DecodeError::BadPrice(_))
        ));
    }

    #[test]
    fn test_unparsable_price_rejected() {
        assert!(matches!(
            decode(r#"{"type":"ticker","price":"two dollars"}"#),
            Err(DecodeError::BadPrice(_))
        ));
    }
}
