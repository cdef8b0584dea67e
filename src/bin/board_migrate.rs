//! Applies or reverts the board schema migrations.
//!
//! Usage:
//!
//! ```text
//! board_migrate <up|down> <config-path>
//! ```
//!
//! `config-path` points at a [`ServiceConfig`] JSON file; the
//! `PENTABOARD_DATABASE_URL` environment variable overrides its database URL.
//! `up` applies every pending migration, `down` reverts the most recent one.

use camino::Utf8PathBuf;
use pentaboard::board::adapters::postgres::migrations::{apply_pending, revert_last};
use pentaboard::config::{ConfigError, ServiceConfig};
use pentaboard::telemetry::init_tracing;
use std::env;
use thiserror::Error;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
enum MigrateError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to check out a connection: {0}")]
    Checkout(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn parse(arg: &str) -> Result<Self, MigrateError> {
        match arg {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(MigrateError::InvalidArgs(format!(
                "unknown direction '{other}'; expected up or down"
            ))),
        }
    }
}

fn main() -> Result<(), BoxError> {
    let (direction, config_path) = parse_args(env::args().skip(1))?;
    let config = ServiceConfig::load(&config_path)?;
    init_tracing(&config.log_filter)?;
    run(direction, &config)?;
    Ok(())
}

fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<(Direction, Utf8PathBuf), MigrateError> {
    let usage =
        || MigrateError::InvalidArgs("usage: board_migrate <up|down> <config-path>".into());
    let direction = Direction::parse(&args.next().ok_or_else(usage)?)?;
    let config_path = Utf8PathBuf::from(args.next().ok_or_else(usage)?);
    if args.next().is_some() {
        return Err(usage());
    }
    Ok((direction, config_path))
}

fn run(direction: Direction, config: &ServiceConfig) -> Result<(), MigrateError> {
    let pool = config.build_pool()?;
    let mut connection = pool.get()?;
    match direction {
        Direction::Up => {
            let applied = apply_pending(&mut *connection)?;
            if applied.is_empty() {
                info!("schema is up to date");
            }
            for name in applied {
                info!(migration = name, "applied");
            }
        }
        Direction::Down => match revert_last(&mut *connection)? {
            Some(name) => info!(migration = name, "reverted"),
            None => info!("nothing to revert"),
        },
    }
    Ok(())
}
