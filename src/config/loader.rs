//! Configuration Loader - File Loading and Validation
//!
//! Handles loading the feed TOML file, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::FeedConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<FeedConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: FeedConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    validate_config(&config)?;

    info!(
        ws_url = %config.ws_url,
        expiry_seconds = config.expiry_seconds,
        read_timeout_ms = config.read_timeout_ms,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty endpoint
/// - Positive durations
/// - Backoff bounds in order
pub fn validate_config(config: &FeedConfig) -> Result<()> {
    anyhow::ensure!(
        !config.ws_url.is_empty(),
        "Feed WebSocket URL must not be empty"
    );
    anyhow::ensure!(
        config.expiry_seconds > 0,
        "expiry_seconds must be positive, got {}",
        config.expiry_seconds
    );
    anyhow::ensure!(
        config.read_timeout_ms > 0,
        "read_timeout_ms must be positive, got {}",
        config.read_timeout_ms
    );
    anyhow::ensure!(
        config.backoff_min_ms > 0,
        "backoff_min_ms must be positive, got {}",
        config.backoff_min_ms
    );
    anyhow::ensure!(
        config.backoff_max_ms >= config.backoff_min_ms,
        "backoff_max_ms ({}) must be >= backoff_min_ms ({})",
        config.backoff_max_ms,
        config.backoff_min_ms
    );

    Ok(())
}
