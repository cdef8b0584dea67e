//! Service configuration loaded from a JSON file.
//!
//! A representative file is:
//!
//! ```json
//! {
//!   "database_url": "postgres://pentaboard@localhost/pentaboard",
//!   "max_pool_size": 8,
//!   "log_filter": "pentaboard=debug,info",
//!   "summary_window_days": 7
//! }
//! ```
//!
//! Only `database_url` is required, and `PENTABOARD_DATABASE_URL` overrides it.

use crate::board::adapters::postgres::BoardPgPool;
use crate::board::domain::DEFAULT_SUMMARY_DAYS;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`ServiceConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "PENTABOARD_DATABASE_URL";

const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration for board services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// `PostgreSQL` connection URL.
    #[serde(default)]
    pub database_url: String,
    /// Maximum pooled connections.
    #[serde(default = "default_pool_size")]
    pub max_pool_size: u32,
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Default board summary window in days.
    #[serde(default = "default_summary_window")]
    pub summary_window_days: i64,
}

const fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

const fn default_summary_window() -> i64 {
    DEFAULT_SUMMARY_DAYS
}

/// Errors returned while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// No database URL was configured.
    #[error("database_url is not set and {DATABASE_URL_ENV} is empty")]
    MissingDatabaseUrl,
    /// The pool size is zero.
    #[error("max_pool_size must be positive")]
    InvalidPoolSize,
    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl ServiceConfig {
    /// Creates a configuration for `database_url` with default settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: DEFAULT_POOL_SIZE,
            log_filter: default_log_filter(),
            summary_window_days: DEFAULT_SUMMARY_DAYS,
        }
    }

    /// Reads and validates the configuration at `path`, applying the
    /// environment override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or the
    /// resulting configuration is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_err = |source: std::io::Error| ConfigError::Read {
            path: path.to_string(),
            source,
        };
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| read_err(std::io::Error::other("path has no file name")))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_err)?;
        let raw = dir.read_to_string(file_name).map_err(read_err)?;

        let parsed = Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        parsed
            .with_env_override(std::env::var(DATABASE_URL_ENV).ok())
            .validated()
    }

    /// Parses configuration JSON without touching the environment.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Replaces the database URL with a non-blank override.
    #[must_use]
    pub fn with_env_override(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url.filter(|value| !value.trim().is_empty()) {
            self.database_url = url;
        }
        self
    }

    /// Checks required settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] or
    /// [`ConfigError::InvalidPoolSize`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if self.max_pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize);
        }
        Ok(self)
    }

    /// Builds the Diesel r2d2 pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the initial connections fail.
    pub fn build_pool(&self) -> Result<BoardPgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        Ok(Pool::builder()
            .max_size(self.max_pool_size)
            .build(manager)?)
    }
}
