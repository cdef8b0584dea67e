//! Tracing subscriber installation.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors returned while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter '{filter}': {source}")]
    InvalidFilter {
        /// Rejected directive.
        filter: String,
        /// Parser error.
        source: tracing_subscriber::filter::ParseError,
    },
    /// A global subscriber is already installed.
    #[error(transparent)]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` when the variable is unset or invalid.
///
/// # Errors
///
/// Returns [`TelemetryError`] when `default_filter` does not parse or a
/// subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| {
            TelemetryError::InvalidFilter {
                filter: default_filter.to_owned(),
                source,
            }
        })?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()?;
    Ok(())
}
