//! Logging initialization
//!
//! Installs a `tracing` subscriber writing to stderr, so stdout stays free
//! for command output.

use tracing::debug;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Invalid filter directive
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Default filter for a `-v` count
#[must_use]
pub const fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolve the filter directive
///
/// `RUST_LOG` wins over `[logging] filter`, which wins over the verbosity
/// level.
///
/// # Errors
///
/// Returns `TelemetryError::Filter` if the chosen directive is invalid.
pub fn build_filter(config: &LoggingConfig, verbosity: u8) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = config
        .filter
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| level_for_verbosity(verbosity));

    EnvFilter::try_new(directive).map_err(|e| TelemetryError::Filter(format!("{directive}: {e}")))
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig, verbosity: u8) -> Result<(), TelemetryError> {
    let filter = build_filter(config, verbosity)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let fmt_layer = if config.json {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(json = config.json, "Logging initialized");
    Ok(())
}
