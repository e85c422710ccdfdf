//! Resilient streaming price feed client.
//!
//! Maintains a continuously updated last-known price from a real-time
//! exchange feed, transparently reconnecting with bounded backoff when the
//! connection drops, and qualifying every query by freshness: a price older
//! than the configured expiry window is reported as expired, never served
//! as current.
//!
//! ```no_run
//! use price_feed_client::adapters::{ExchangeWsTransport, TickerDecoder};
//! use price_feed_client::config::FeedConfig;
//! use price_feed_client::usecases::FeedClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = FeedConfig::for_endpoint("wss://ws-feed.exchange.example");
//! let transport = ExchangeWsTransport::new(&config);
//! let client = FeedClient::new(config, transport, TickerDecoder::new())?;
//!
//! client.start()?;
//! match client.price() {
//!     result if result.is_fresh() => println!("price: {:?}", result.value()),
//!     stale => println!("no fresh price: {stale:?}"),
//! }
//! client.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
