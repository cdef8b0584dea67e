//! When steps for board column ordering BDD scenarios.

use super::world::{ColumnOrderingWorld, run_async};
use eyre::WrapErr;
use pentaboard::board::services::{
    AddColumnRequest, CreateWorkItemRequest, DeleteColumnRequest, MoveColumnRequest,
    MoveWorkItemRequest, RenameColumnRequest,
};
use rstest_bdd_macros::when;

#[when(r#"the column "{name}" is added after "{anchor}""#)]
fn add_column_after(
    world: &mut ColumnOrderingWorld,
    name: String,
    anchor: String,
) -> Result<(), eyre::Report> {
    let anchor_column = world.column_named(&anchor)?;
    run_async(world.columns.add_column(
        &world.actor,
        AddColumnRequest::new(world.project_id, name).after(anchor_column.id()),
    ))
    .wrap_err("add column after anchor")?;
    Ok(())
}

#[when(r#"the column "{name}" is added at the end"#)]
fn append_column(world: &mut ColumnOrderingWorld, name: String) -> Result<(), eyre::Report> {
    run_async(
        world
            .columns
            .add_column(&world.actor, AddColumnRequest::new(world.project_id, name)),
    )
    .wrap_err("append column")?;
    Ok(())
}

#[when(r#"the column "{name}" is moved to index {index:i64}"#)]
fn move_column(
    world: &mut ColumnOrderingWorld,
    name: String,
    index: i64,
) -> Result<(), eyre::Report> {
    let column = world.column_named(&name)?;
    run_async(world.columns.move_column(
        &world.actor,
        MoveColumnRequest::new(world.project_id, column.id(), index),
    ))
    .wrap_err("move column")?;
    Ok(())
}

#[when(r#"the column "{name}" is renamed to "{new_name}""#)]
fn rename_column(
    world: &mut ColumnOrderingWorld,
    name: String,
    new_name: String,
) -> Result<(), eyre::Report> {
    let column = world.column_named(&name)?;
    let result = run_async(world.columns.rename_column(
        &world.actor,
        RenameColumnRequest::new(world.project_id, column.id(), new_name),
    ));
    world.last_error = result.err();
    Ok(())
}

#[when(r#"the column "{name}" is deleted"#)]
fn delete_column(world: &mut ColumnOrderingWorld, name: String) -> Result<(), eyre::Report> {
    let column = world.column_named(&name)?;
    let result = run_async(world.columns.delete_column(
        &world.actor,
        DeleteColumnRequest::new(world.project_id, column.id()),
    ));
    world.last_error = result.err();
    Ok(())
}

#[when(r#"the column "{name}" is deleted moving its items to "{fallback}""#)]
fn delete_column_reassigning(
    world: &mut ColumnOrderingWorld,
    name: String,
    fallback: String,
) -> Result<(), eyre::Report> {
    let column = world.column_named(&name)?;
    let target = world.column_named(&fallback)?;
    run_async(world.columns.delete_column(
        &world.actor,
        DeleteColumnRequest::new(world.project_id, column.id()).reassigning_items_to(target.id()),
    ))
    .wrap_err("delete column with reassignment")?;
    Ok(())
}

#[when(r#"a work item "{title}" is created in "{column}""#)]
fn create_work_item(
    world: &mut ColumnOrderingWorld,
    title: String,
    column: String,
) -> Result<(), eyre::Report> {
    let target = world.column_named(&column)?;
    let item = run_async(world.placement.create_work_item(
        &world.actor,
        CreateWorkItemRequest::new(world.project_id, target.board_id(), title.clone())
            .in_column(target.id()),
    ))
    .wrap_err("create work item")?;
    world.work_items.insert(title, item);
    Ok(())
}

#[when(r#"the work item "{title}" is moved to "{column}""#)]
fn move_work_item(
    world: &mut ColumnOrderingWorld,
    title: String,
    column: String,
) -> Result<(), eyre::Report> {
    let target = world.column_named(&column)?;
    let item = world
        .work_items
        .get(&title)
        .ok_or_else(|| eyre::eyre!("no work item titled {title} in scenario world"))?;
    let moved = run_async(world.placement.move_work_item(
        &world.actor,
        MoveWorkItemRequest::new(world.project_id, item.board_id(), item.id(), target.id()),
    ))
    .wrap_err("move work item")?;
    world.work_items.insert(title, moved);
    Ok(())
}
