//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `ws`: exchange WebSocket transport (tokio-tungstenite)
//! - `ticker`: exchange ticker/heartbeat JSON decoder

pub mod ticker;
pub mod ws;

pub use ticker::TickerDecoder;
pub use ws::ExchangeWsTransport;
