//! Process-wide `tracing` subscriber setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    /// A global subscriber was already installed.
    #[error("tracing subscriber already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Installs a formatted subscriber filtered by `filter` (`RUST_LOG` syntax).
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(filter: &str) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInitialised(err.to_string()))
}
