//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_LOG_FILTER: &str = "info";

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP listener binds to (`ROTA_BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// `PostgreSQL` connection URL (`DATABASE_URL`). In-memory storage is
    /// used when unset.
    pub database_url: Option<String>,
    /// Maximum pooled database connections (`ROTA_DB_POOL_SIZE`).
    pub pool_size: u32,
    /// Per-request deadline (`ROTA_REQUEST_TIMEOUT_SECS`).
    pub request_timeout: Duration,
    /// `tracing` filter directive (`RUST_LOG`).
    pub log_filter: String,
}

/// Error returned for malformed configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Human-readable description of the accepted format.
        expected: &'static str,
    },
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set to an
    /// unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, treating blank values as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set to an
    /// unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr = read("ROTA_BIND_ADDR").map_or_else(
            || Ok(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))),
            |raw| {
                raw.trim()
                    .parse::<SocketAddr>()
                    .map_err(|_| invalid("ROTA_BIND_ADDR", raw, "a socket address"))
            },
        )?;
        let pool_size = read("ROTA_DB_POOL_SIZE").map_or(Ok(DEFAULT_POOL_SIZE), |raw| {
            positive(&raw).ok_or_else(|| invalid("ROTA_DB_POOL_SIZE", raw, "a positive integer"))
        })?;
        let timeout_secs = read("ROTA_REQUEST_TIMEOUT_SECS").map_or(
            Ok(DEFAULT_REQUEST_TIMEOUT_SECS),
            |raw| {
                positive(&raw).ok_or_else(|| {
                    invalid("ROTA_REQUEST_TIMEOUT_SECS", raw, "a positive integer")
                })
            },
        )?;

        Ok(Self {
            bind_addr,
            database_url: read("DATABASE_URL"),
            pool_size,
            request_timeout: Duration::from_secs(timeout_secs),
            log_filter: read("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
        })
    }
}

fn positive<T>(raw: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|value| *value > T::default())
}

const fn invalid(name: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value,
        expected,
    }
}
