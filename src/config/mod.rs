//! Configuration Module - TOML-based Feed Configuration
//!
//! Loads and validates configuration from a TOML file. Endpoint and
//! subscription payload are externalized here - nothing is hardcoded in the
//! domain layer. Durations are plain integers in the file (field names carry
//! the unit) with `Duration` accessors for the core.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

/// Feed client configuration.
///
/// Loaded from TOML at startup, or built in code for embedded use. All
/// fields are validated before the client starts.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// WebSocket endpoint of the exchange feed.
    pub ws_url: String,
    /// Subscription request sent after connecting. Opaque to the core;
    /// the transport ships it verbatim.
    #[serde(default)]
    pub subscription: Option<String>,
    /// Seconds without an accepted update before the price is stale.
    #[serde(default = "default_expiry_seconds")]
    pub expiry_seconds: u64,
    /// Milliseconds to wait for a message before declaring the connection
    /// dead. Independent of, and typically shorter than, the expiry window.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// First reconnect delay after a failure (milliseconds).
    #[serde(default = "default_backoff_min_ms")]
    pub backoff_min_ms: u64,
    /// Reconnect delay cap (milliseconds).
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl FeedConfig {
    /// Minimal config for a given endpoint, defaults everywhere else.
    pub fn for_endpoint(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            subscription: None,
            expiry_seconds: default_expiry_seconds(),
            read_timeout_ms: default_read_timeout_ms(),
            backoff_min_ms: default_backoff_min_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }

    /// Expiry window as a `Duration`.
    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_seconds)
    }

    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Minimum backoff delay as a `Duration`.
    pub fn backoff_min(&self) -> Duration {
        Duration::from_millis(self.backoff_min_ms)
    }

    /// Maximum backoff delay as a `Duration`.
    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}

// Default value functions for serde

fn default_expiry_seconds() -> u64 {
    30
}

fn default_read_timeout_ms() -> u64 {
    10_000
}

fn default_backoff_min_ms() -> u64 {
    1_000
}

fn default_backoff_max_ms() -> u64 {
    60_000
}
