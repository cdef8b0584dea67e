//! Ledger-driven apply and revert of the board schema.

use pentaboard::board::adapters::postgres::migrations::{MIGRATIONS, apply_pending, revert_last};
use pentaboard::config::ServiceConfig;
use rstest::rstest;

use crate::postgres_board::helpers::{BoxError, PgBoardContext, context};

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_migrations_are_idempotent(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let mut connection = ctx.pool.get()?;

    let applied = apply_pending(&mut *connection)?;

    assert!(applied.is_empty());
    Ok(())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_migrations_revert_newest_first(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let mut connection = ctx.pool.get()?;
    let expected_order: Vec<_> = MIGRATIONS
        .iter()
        .rev()
        .map(|migration| migration.name)
        .collect();

    let mut reverted = Vec::new();
    while let Some(name) = revert_last(&mut *connection)? {
        reverted.push(name);
    }
    let reapplied = apply_pending(&mut *connection)?;
    drop(connection);

    assert_eq!(reverted, expected_order);
    assert_eq!(reapplied.len(), MIGRATIONS.len());
    assert_eq!(ctx.columns_now().await?.len(), 3);
    Ok(())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_configured_pool_reaches_the_migrated_schema(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let mut config = ServiceConfig::new(ctx.database_url.clone());
    config.max_pool_size = 1;

    let pool = config.validated()?.build_pool()?;
    let applied = apply_pending(&mut *pool.get()?)?;

    assert!(applied.is_empty());
    assert_eq!(pool.max_size(), 1);
    Ok(())
}
