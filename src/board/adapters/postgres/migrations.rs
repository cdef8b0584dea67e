//! Embedded SQL migrations for the board schema.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

/// One schema change with its forward and reverse SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Directory name under `migrations/`, used as the version key.
    pub name: &'static str,
    /// Forward SQL.
    pub up: &'static str,
    /// Reverse SQL.
    pub down: &'static str,
}

/// Board schema migrations in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "2026-10-18-000000_create_boards",
        up: include_str!("../../../../migrations/2026-10-18-000000_create_boards/up.sql"),
        down: include_str!("../../../../migrations/2026-10-18-000000_create_boards/down.sql"),
    },
    Migration {
        name: "2026-10-18-000001_create_work_items",
        up: include_str!("../../../../migrations/2026-10-18-000001_create_work_items/up.sql"),
        down: include_str!("../../../../migrations/2026-10-18-000001_create_work_items/down.sql"),
    },
];

const CREATE_LEDGER_SQL: &str = concat!(
    "CREATE TABLE IF NOT EXISTS board_schema_migrations (",
    "name VARCHAR(100) PRIMARY KEY, ",
    "applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
);

diesel::table! {
    /// Ledger of applied board migrations.
    board_schema_migrations (name) {
        /// Migration directory name.
        #[max_length = 100]
        name -> Varchar,
        /// When the migration was applied.
        applied_at -> Timestamptz,
    }
}

/// Applies every migration not yet recorded, each in its own transaction.
///
/// Returns the names of the migrations applied by this call.
///
/// # Errors
///
/// Returns the underlying Diesel error when a statement fails; the failing
/// migration is rolled back.
pub fn apply_pending(connection: &mut PgConnection) -> Result<Vec<&'static str>, DieselError> {
    connection.batch_execute(CREATE_LEDGER_SQL)?;
    let mut applied = Vec::new();
    for migration in MIGRATIONS {
        let done = connection.transaction::<_, DieselError, _>(|tx| {
            let recorded: i64 = board_schema_migrations::table
                .filter(board_schema_migrations::name.eq(migration.name))
                .count()
                .get_result(tx)?;
            if recorded > 0 {
                return Ok(false);
            }
            tx.batch_execute(migration.up)?;
            diesel::insert_into(board_schema_migrations::table)
                .values(board_schema_migrations::name.eq(migration.name))
                .execute(tx)?;
            Ok(true)
        })?;
        if done {
            applied.push(migration.name);
        }
    }
    Ok(applied)
}

/// Reverts the most recently applied migration, if any.
///
/// # Errors
///
/// Returns the underlying Diesel error when a statement fails.
pub fn revert_last(connection: &mut PgConnection) -> Result<Option<&'static str>, DieselError> {
    connection.batch_execute(CREATE_LEDGER_SQL)?;
    connection.transaction::<_, DieselError, _>(|tx| {
        let recorded: Vec<String> = board_schema_migrations::table
            .select(board_schema_migrations::name)
            .load(tx)?;
        let Some(last) = MIGRATIONS
            .iter()
            .rev()
            .find(|migration| recorded.iter().any(|name| name == migration.name))
        else {
            return Ok(None);
        };
        tx.batch_execute(last.down)?;
        diesel::delete(
            board_schema_migrations::table.filter(board_schema_migrations::name.eq(last.name)),
        )
        .execute(tx)?;
        Ok(Some(last.name))
    })
}
