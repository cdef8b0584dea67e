//! Shared helpers for `PostgreSQL` board tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pentaboard::access::{ActingUser, Role};
use pentaboard::board::{
    adapters::postgres::{BoardPgPool, PostgresBoardStore, migrations::apply_pending},
    domain::{BoardColumn, ProjectId, UserId},
    services::{BoardService, ColumnOrderingService, WorkItemPlacementService},
};
use rstest::fixture;
use std::sync::Arc;
use uuid::Uuid;

/// Boxed error type for test results.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the test database.
pub const TEST_DATABASE_URL_ENV: &str = "PENTABOARD_TEST_DATABASE_URL";

/// Schema created for one test and dropped when the context is dropped.
pub struct TemporarySchema {
    admin_url: String,
    name: String,
}

impl TemporarySchema {
    fn create(admin_url: &str) -> Result<Self, BoxError> {
        let name = format!("board_test_{}", Uuid::new_v4().simple());
        let mut connection = PgConnection::establish(admin_url)?;
        connection.batch_execute(&format!("CREATE SCHEMA \"{name}\""))?;
        Ok(Self {
            admin_url: admin_url.to_owned(),
            name,
        })
    }

    /// Connection URL that resolves unqualified names in this schema.
    fn scoped_url(&self) -> String {
        let separator = if self.admin_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}options=-csearch_path%3D{}",
            self.admin_url, self.name
        )
    }
}

impl Drop for TemporarySchema {
    fn drop(&mut self) {
        let dropped = PgConnection::establish(&self.admin_url)
            .map_err(|err| Box::new(err) as BoxError)
            .and_then(|mut connection| {
                connection
                    .batch_execute(&format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", self.name))
                    .map_err(|err| Box::new(err) as BoxError)
            });
        if let Err(err) = dropped {
            tracing::warn!(schema = %self.name, error = %err, "failed to drop test schema");
        }
    }
}

/// Board services wired to one `PostgreSQL` store.
pub struct PgBoardContext {
    pub store: Arc<PostgresBoardStore>,
    pub pool: BoardPgPool,
    pub boards: BoardService<PostgresBoardStore, PostgresBoardStore, DefaultClock>,
    pub columns: ColumnOrderingService<PostgresBoardStore, DefaultClock>,
    pub placement: WorkItemPlacementService<PostgresBoardStore, PostgresBoardStore, DefaultClock>,
    pub actor: ActingUser,
    pub project_id: ProjectId,
    pub database_url: String,
    _schema: TemporarySchema,
}

impl PgBoardContext {
    /// Returns the project's board columns, seeding the board if needed.
    ///
    /// # Errors
    ///
    /// Returns the service error when the lookup fails.
    pub async fn columns_now(&self) -> Result<Vec<BoardColumn>, BoxError> {
        Ok(self
            .boards
            .get_board(&self.actor, self.project_id)
            .await?
            .columns)
    }

    /// Finds a column by name.
    ///
    /// # Errors
    ///
    /// Returns an error when no column has the name.
    pub async fn column(&self, name: &str) -> Result<BoardColumn, BoxError> {
        self.columns_now()
            .await?
            .into_iter()
            .find(|column| column.name().as_str() == name)
            .ok_or_else(|| format!("column {name} not found").into())
    }

    /// Names and keys of the board's columns in order.
    ///
    /// # Errors
    ///
    /// Returns the service error when the lookup fails.
    pub async fn layout(&self) -> Result<Vec<(String, i32)>, BoxError> {
        Ok(self
            .columns_now()
            .await?
            .iter()
            .map(|column| (column.name().as_str().to_owned(), column.order_key().value()))
            .collect())
    }
}

/// Builds the expected layout from literal pairs.
#[must_use]
pub fn expected(pairs: &[(&str, i32)]) -> Vec<(String, i32)> {
    pairs
        .iter()
        .map(|(name, key)| ((*name).to_owned(), *key))
        .collect()
}

fn build_context(admin_url: &str) -> Result<PgBoardContext, BoxError> {
    let schema = TemporarySchema::create(admin_url)?;
    let database_url = schema.scoped_url();
    let manager = ConnectionManager::<PgConnection>::new(database_url.clone());
    let pool: BoardPgPool = Pool::builder()
        .max_size(2)
        .build(manager)
        .map_err(|err| Box::new(err) as BoxError)?;
    apply_pending(&mut *pool.get()?)?;

    let store = Arc::new(PostgresBoardStore::new(pool.clone()));
    let clock = Arc::new(DefaultClock);
    Ok(PgBoardContext {
        boards: BoardService::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&clock)),
        columns: ColumnOrderingService::new(Arc::clone(&store), Arc::clone(&clock)),
        placement: WorkItemPlacementService::new(Arc::clone(&store), Arc::clone(&store), clock),
        store,
        pool,
        actor: ActingUser::new(UserId::new(), Role::Admin),
        project_id: ProjectId::new(),
        database_url,
        _schema: schema,
    })
}

/// Provides a migrated schema in the database named by
/// `PENTABOARD_TEST_DATABASE_URL`.
///
/// # Errors
///
/// Returns an error when the variable is unset or the database cannot be
/// prepared.
#[fixture]
pub fn context() -> Result<PgBoardContext, BoxError> {
    let admin_url = std::env::var(TEST_DATABASE_URL_ENV)
        .map_err(|err| format!("{TEST_DATABASE_URL_ENV} must name a test database: {err}"))?;
    build_context(&admin_url)
}
