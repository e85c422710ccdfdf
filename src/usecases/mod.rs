//! Use Cases Layer - Feed Client Workflows
//!
//! Orchestrates domain logic with port interfaces to implement the client's
//! core workflows. Each use case is a self-contained concern.
//!
//! Use cases:
//! - `ReconnectController`: connect / consume / backoff loop, forever
//! - `PriceStore`: single shared last-known-price value
//! - `ExpiryWatcher`: edge-triggered stale/available notifications
//! - `FeedClient`: facade composing the above

pub mod client;
pub mod controller;
pub mod expiry;
pub mod price_store;

pub use client::{FeedClient, StoppedError};
pub use controller::ReconnectController;
pub use price_store::PriceStore;
