//! Given steps for board column ordering BDD scenarios.

use super::world::{ColumnOrderingWorld, run_async};
use eyre::WrapErr;
use pentaboard::board::services::CreateWorkItemRequest;
use rstest_bdd_macros::given;

#[given("a project board with the default columns")]
fn default_board(world: &ColumnOrderingWorld) -> Result<(), eyre::Report> {
    let columns = world.current_columns()?;
    if columns.len() != 3 {
        return Err(eyre::eyre!("expected 3 seeded columns, found {}", columns.len()));
    }
    Ok(())
}

#[given(r#"a work item "{title}" exists in "{column}""#)]
fn existing_work_item(
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
    .wrap_err("create work item in scenario setup")?;
    world.work_items.insert(title, item);
    Ok(())
}
