//! Work item placement against `PostgreSQL`.

use pentaboard::board::{
    domain::WorkItem,
    services::{BoardErrorKind, CreateWorkItemRequest, MoveWorkItemRequest},
};
use rstest::rstest;

use crate::postgres_board::helpers::{BoxError, PgBoardContext, context};

fn keys(items: &[WorkItem]) -> Vec<i32> {
    items.iter().map(|item| item.order_key().value()).collect()
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_items_append_and_reappend_on_move(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let todo = ctx.column("To Do").await?;
    let doing = ctx.column("Doing").await?;
    let board_id = todo.board_id();

    let first = ctx
        .placement
        .create_work_item(
            &ctx.actor,
            CreateWorkItemRequest::new(ctx.project_id, board_id, "Draft release notes")
                .with_priority(2),
        )
        .await?;
    let second = ctx
        .placement
        .create_work_item(
            &ctx.actor,
            CreateWorkItemRequest::new(ctx.project_id, board_id, "Tag release"),
        )
        .await?;
    ctx.placement
        .create_work_item(
            &ctx.actor,
            CreateWorkItemRequest::new(ctx.project_id, board_id, "Deploy").in_column(doing.id()),
        )
        .await?;

    assert_eq!(first.column_id(), todo.id());
    assert_eq!(keys(&[first.clone(), second]), [10, 20]);

    let moved = ctx
        .placement
        .move_work_item(
            &ctx.actor,
            MoveWorkItemRequest::new(ctx.project_id, board_id, first.id(), doing.id()),
        )
        .await?;
    assert_eq!(moved.order_key().value(), 20);

    let stored = ctx
        .placement
        .get_work_item(ctx.project_id, board_id, first.id())
        .await?;
    assert_eq!(stored.column_id(), doing.id());
    assert_eq!(stored.order_key(), moved.order_key());
    let remaining = ctx
        .placement
        .list_column_items(ctx.project_id, board_id, todo.id())
        .await?;
    assert_eq!(keys(&remaining), [20]);
    Ok(())
}

#[rstest]
#[ignore = "requires PENTABOARD_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_deleted_items_leave_gaps(
    context: Result<PgBoardContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context?;
    let todo = ctx.column("To Do").await?;
    let board_id = todo.board_id();
    let mut created = Vec::new();
    for title in ["One", "Two", "Three"] {
        created.push(
            ctx.placement
                .create_work_item(
                    &ctx.actor,
                    CreateWorkItemRequest::new(ctx.project_id, board_id, title),
                )
                .await?,
        );
    }
    let first = created.first().ok_or("no item created")?;

    ctx.placement
        .delete_work_item(&ctx.actor, ctx.project_id, board_id, first.id())
        .await?;
    let missing = ctx
        .placement
        .get_work_item(ctx.project_id, board_id, first.id())
        .await;

    assert!(matches!(missing, Err(ref err) if err.kind() == BoardErrorKind::NotFound));
    let remaining = ctx
        .placement
        .list_column_items(ctx.project_id, board_id, todo.id())
        .await?;
    assert_eq!(keys(&remaining), [20, 30]);
    Ok(())
}
