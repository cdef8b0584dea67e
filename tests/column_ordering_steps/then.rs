//! Then steps for board column ordering BDD scenarios.

use super::world::{ColumnOrderingWorld, parse_layout, run_async};
use pentaboard::board::services::BoardErrorKind;
use rstest_bdd_macros::then;

#[then(r#"the board columns are "{layout}""#)]
fn board_columns_are(world: &ColumnOrderingWorld, layout: String) -> Result<(), eyre::Report> {
    let expected = parse_layout(&layout)?;
    let actual: Vec<(String, i32)> = world
        .current_columns()?
        .iter()
        .map(|column| (column.name().as_str().to_owned(), column.order_key().value()))
        .collect();
    if actual != expected {
        return Err(eyre::eyre!("expected columns {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the work items in "{column}" are "{layout}""#)]
fn work_items_are(
    world: &ColumnOrderingWorld,
    column: String,
    layout: String,
) -> Result<(), eyre::Report> {
    let expected = parse_layout(&layout)?;
    let target = world.column_named(&column)?;
    let items = run_async(world.placement.list_column_items(
        world.project_id,
        target.board_id(),
        target.id(),
    ))
    .map_err(|err| eyre::eyre!("listing column items failed: {err}"))?;
    let actual: Vec<(String, i32)> = items
        .iter()
        .map(|item| (item.title().as_str().to_owned(), item.order_key().value()))
        .collect();
    if actual != expected {
        return Err(eyre::eyre!("expected items {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("the operation fails with a conflict")]
fn operation_conflicts(world: &ColumnOrderingWorld) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last operation to fail"))?;
    if err.kind() != BoardErrorKind::Conflict {
        return Err(eyre::eyre!("expected a conflict, found {err}"));
    }
    Ok(())
}
