//! Column ordering against the real unique indexes.

use pentaboard::board::{
    domain::{BoardColumn, ColumnName, OrderKey},
    ports::{BoardRepository, BoardRepositoryError},
    services::{
        AddColumnRequest, BoardErrorKind, CreateWorkItemRequest, DeleteColumnRequest,
        MoveColumnRequest, RenameColumnRequest,
    },
};
use rstest::rstest;

use crate::postgres_board::helpers::{BoxError, PgBoardContext, context, expected};

async fn add_after(ctx: &PgBoardContext, name: &str, anchor: &str) -> Result<i32, BoxError> {
    let anchor_id = ctx.column(anchor).await?.id();
    let added = ctx
        .columns
        .add_column(
            &ctx.actor,
            AddColumnRequest::new(ctx.project_id, name).after(anchor_id),
        )
        .await?;
    Ok(added.order_key().value())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_gap_inserts_then_renormalizes(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;

    assert_eq!(add_after(&ctx, "Review", "To Do").await?, 15);
    assert_eq!(add_after(&ctx, "QA", "To Do").await?, 12);
    assert_eq!(add_after(&ctx, "Triage", "To Do").await?, 11);
    assert_eq!(add_after(&ctx, "Blocked", "To Do").await?, 20);

    assert_eq!(
        ctx.layout().await?,
        expected(&[
            ("To Do", 10),
            ("Blocked", 20),
            ("Triage", 30),
            ("QA", 40),
            ("Review", 50),
            ("Doing", 60),
            ("Done", 70),
        ])
    );
    Ok(())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_move_renumbers_without_index_violations(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let done = ctx.column("Done").await?;

    let ordered = ctx
        .columns
        .move_column(
            &ctx.actor,
            MoveColumnRequest::new(ctx.project_id, done.id(), 0),
        )
        .await?;
    let doing = ctx.column("Doing").await?;
    ctx.columns
        .move_column(
            &ctx.actor,
            MoveColumnRequest::new(ctx.project_id, doing.id(), -1),
        )
        .await?;

    assert_eq!(ordered.first().map(BoardColumn::id), Some(done.id()));
    assert_eq!(
        ctx.layout().await?,
        expected(&[("Doing", 10), ("Done", 20), ("To Do", 30)])
    );
    Ok(())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_delete_compacts_and_guards_items(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let doing = ctx.column("Doing").await?;
    let todo = ctx.column("To Do").await?;
    ctx.placement
        .create_work_item(
            &ctx.actor,
            CreateWorkItemRequest::new(ctx.project_id, doing.board_id(), "Active")
                .in_column(doing.id()),
        )
        .await?;

    let refused = ctx
        .columns
        .delete_column(
            &ctx.actor,
            DeleteColumnRequest::new(ctx.project_id, doing.id()),
        )
        .await;
    assert!(matches!(refused, Err(ref err) if err.kind() == BoardErrorKind::Conflict));

    let remaining = ctx
        .columns
        .delete_column(
            &ctx.actor,
            DeleteColumnRequest::new(ctx.project_id, doing.id()).reassigning_items_to(todo.id()),
        )
        .await?;

    let keys: Vec<_> = remaining
        .iter()
        .map(|column| column.order_key().value())
        .collect();
    assert_eq!(keys, [10, 20]);
    let moved = ctx
        .placement
        .list_column_items(ctx.project_id, todo.board_id(), todo.id())
        .await?;
    assert_eq!(moved.len(), 1);
    Ok(())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_unique_indexes_map_to_typed_errors(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let doing = ctx.column("Doing").await?;

    let same_key = BoardColumn::new(
        doing.board_id(),
        ColumnName::new("Parallel")?,
        doing.order_key(),
    );
    let same_name = BoardColumn::new(
        doing.board_id(),
        ColumnName::new("DOING")?,
        OrderKey::new(25)?,
    );

    let key_result = ctx.store.insert_column(&same_key).await;
    let name_result = ctx.store.insert_column(&same_name).await;

    assert!(matches!(
        key_result,
        Err(BoardRepositoryError::OrderKeyConflict(_))
    ));
    assert!(matches!(
        name_result,
        Err(BoardRepositoryError::DuplicateColumnName(_))
    ));
    Ok(())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_rename_leaves_the_key_alone(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let doing = ctx.column("Doing").await?;

    ctx.columns
        .rename_column(
            &ctx.actor,
            RenameColumnRequest::new(ctx.project_id, doing.id(), "In Progress"),
        )
        .await?;
    let taken = ctx
        .columns
        .rename_column(
            &ctx.actor,
            RenameColumnRequest::new(ctx.project_id, doing.id(), "to do"),
        )
        .await;

    assert!(matches!(taken, Err(ref err) if err.kind() == BoardErrorKind::Conflict));
    assert_eq!(
        ctx.layout().await?,
        expected(&[("To Do", 10), ("In Progress", 20), ("Done", 30)])
    );
    Ok(())
}
