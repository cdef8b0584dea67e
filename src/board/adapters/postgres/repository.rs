//! `PostgreSQL` repository implementation for boards, columns and work items.

use super::{
    models::{BoardRow, ColumnRow, WorkItemRow},
    schema::{board_columns, boards, work_items},
};
use crate::board::{
    domain::{
        Board, BoardColumn, BoardId, ColumnId, ColumnSequence, OrderKey, ProjectId, RenumberPlan,
        WorkItem, WorkItemId, order_key::append_run,
    },
    ports::{
        BoardRepository, BoardRepositoryError, BoardRepositoryResult, ColumnRemoval,
        ItemDisposition, WorkItemRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

const PROJECT_UNIQUE_INDEX: &str = "idx_boards_project_unique";
const ORDER_UNIQUE_INDEX: &str = "idx_board_columns_order_unique";
const NAME_UNIQUE_INDEX: &str = "idx_board_columns_name_unique";

/// `PostgreSQL`-backed store implementing both board ports.
///
/// Every port method runs in its own transaction on a pooled connection,
/// offloaded through [`tokio::task::spawn_blocking`]. Dropping the returned
/// future does not interrupt a transaction that has already started; it
/// commits or rolls back as a unit.
#[derive(Debug, Clone)]
pub struct PostgresBoardStore {
    pool: BoardPgPool,
}

impl PostgresBoardStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }

    async fn run_transaction<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |connection| connection.transaction::<_, BoardRepositoryError, _>(f))
            .await
    }
}

impl From<DieselError> for BoardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardStore {
    async fn find_board_by_project(
        &self,
        project_id: ProjectId,
    ) -> BoardRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .filter(boards::project_id.eq(project_id.into_inner()))
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()?;
            Ok(row.map(Board::from))
        })
        .await
    }

    async fn find_board(&self, board_id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .find(board_id.into_inner())
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()?;
            Ok(row.map(Board::from))
        })
        .await
    }

    async fn create_board(
        &self,
        board: &Board,
        columns: &[BoardColumn],
    ) -> BoardRepositoryResult<()> {
        let project_id = board.project_id();
        let board_id = board.id();
        let board_row = BoardRow::from(board);
        let column_rows: Vec<ColumnRow> = columns.iter().map(ColumnRow::from).collect();

        self.run_transaction(move |tx| {
            diesel::insert_into(boards::table)
                .values(&board_row)
                .execute(tx)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if constraint_is(info.as_ref(), PROJECT_UNIQUE_INDEX) =>
                    {
                        BoardRepositoryError::DuplicateBoard(project_id)
                    }
                    _ => BoardRepositoryError::persistence(err),
                })?;
            for row in &column_rows {
                insert_column_row(tx, board_id, row)?;
            }
            Ok(())
        })
        .await
    }

    async fn seed_columns(
        &self,
        board: &Board,
        columns: &[BoardColumn],
    ) -> BoardRepositoryResult<()> {
        let board_id = board.id();
        let seeded_board = board.clone();
        let column_rows: Vec<ColumnRow> = columns.iter().map(ColumnRow::from).collect();

        self.run_transaction(move |tx| {
            lock_board(tx, board_id)?;
            if !load_columns(tx, board_id)?.is_empty() {
                return Err(BoardRepositoryError::StaleOrdering(board_id));
            }
            for row in &column_rows {
                insert_column_row(tx, board_id, row)?;
            }
            write_board_pointers(tx, &seeded_board)
        })
        .await
    }

    async fn list_columns(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<BoardColumn>> {
        self.run_blocking(move |connection| Ok(load_columns(connection, board_id)?.into_vec()))
            .await
    }

    async fn insert_column(&self, column: &BoardColumn) -> BoardRepositoryResult<()> {
        let board_id = column.board_id();
        let row = ColumnRow::from(column);
        self.run_transaction(move |tx| {
            lock_board(tx, board_id)?;
            insert_column_row(tx, board_id, &row)
        })
        .await
    }

    async fn update_column(&self, column: &BoardColumn) -> BoardRepositoryResult<()> {
        let board_id = column.board_id();
        let column_id = column.id();
        let row = ColumnRow::from(column);
        self.run_transaction(move |tx| {
            let updated = diesel::update(
                board_columns::table
                    .filter(board_columns::id.eq(row.id))
                    .filter(board_columns::board_id.eq(row.board_id)),
            )
            .set((
                board_columns::name.eq(&row.name),
                board_columns::color.eq(&row.color),
                board_columns::wip_limit.eq(row.wip_limit),
                board_columns::is_default.eq(row.is_default),
                board_columns::is_done_like.eq(row.is_done_like),
            ))
            .execute(tx)
            .map_err(|err| map_column_write(err, board_id))?;
            if updated == 0 {
                return Err(BoardRepositoryError::ColumnNotFound(column_id));
            }
            Ok(())
        })
        .await
    }

    async fn reorder_columns(
        &self,
        board_id: BoardId,
        desired: Vec<ColumnId>,
        inserted: Option<BoardColumn>,
    ) -> BoardRepositoryResult<Vec<BoardColumn>> {
        self.run_transaction(move |tx| {
            lock_board(tx, board_id)?;
            renumber(tx, board_id, &desired, inserted.as_ref())
        })
        .await
    }

    async fn remove_column(
        &self,
        removal: ColumnRemoval,
    ) -> BoardRepositoryResult<Vec<BoardColumn>> {
        self.run_transaction(move |tx| {
            let board_id = removal.board.id();
            lock_board(tx, board_id)?;
            let current = load_columns(tx, board_id)?;
            if current.find(removal.column_id).is_none() {
                return Err(BoardRepositoryError::ColumnNotFound(removal.column_id));
            }

            match removal.items {
                ItemDisposition::RequireEmpty => {
                    let count = count_items(tx, board_id, removal.column_id)?;
                    if count > 0 {
                        return Err(BoardRepositoryError::ColumnNotEmpty {
                            column_id: removal.column_id,
                            count,
                        });
                    }
                }
                ItemDisposition::ReassignTo(target) => {
                    if target == removal.column_id || current.find(target).is_none() {
                        return Err(BoardRepositoryError::ColumnNotFound(target));
                    }
                    reassign_items(tx, board_id, removal.column_id, target, removal.requested_at)?;
                }
            }

            diesel::delete(board_columns::table.find(removal.column_id.into_inner())).execute(tx)?;
            write_board_pointers(tx, &removal.board)?;
            renumber(tx, board_id, &removal.remaining_order, None)
        })
        .await
    }
}

#[async_trait]
impl WorkItemRepository for PostgresBoardStore {
    async fn store(&self, item: &WorkItem) -> BoardRepositoryResult<()> {
        let column_id = item.column_id();
        let row = WorkItemRow::from(item);
        self.run_blocking(move |connection| {
            diesel::insert_into(work_items::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        BoardRepositoryError::ColumnNotFound(column_id)
                    }
                    _ => BoardRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, item: &WorkItem) -> BoardRepositoryResult<()> {
        let item_id = item.id();
        let column_id = item.column_id();
        let row = WorkItemRow::from(item);
        self.run_blocking(move |connection| {
            let updated = diesel::update(work_items::table.find(row.id))
                .set((
                    work_items::column_id.eq(row.column_id),
                    work_items::order_key.eq(row.order_key),
                    work_items::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        BoardRepositoryError::ColumnNotFound(column_id)
                    }
                    _ => BoardRepositoryError::persistence(err),
                })?;
            if updated == 0 {
                return Err(BoardRepositoryError::WorkItemNotFound(item_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: WorkItemId) -> BoardRepositoryResult<Option<WorkItem>> {
        self.run_blocking(move |connection| {
            let row = work_items::table
                .find(id.into_inner())
                .select(WorkItemRow::as_select())
                .first::<WorkItemRow>(connection)
                .optional()?;
            row.map(WorkItem::try_from).transpose()
        })
        .await
    }

    async fn delete(&self, id: WorkItemId) -> BoardRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(work_items::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(BoardRepositoryError::WorkItemNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn max_order_key(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Option<OrderKey>> {
        self.run_blocking(move |connection| {
            let max = work_items::table
                .filter(work_items::board_id.eq(board_id.into_inner()))
                .filter(work_items::column_id.eq(column_id.into_inner()))
                .select(diesel::dsl::max(work_items::order_key))
                .first::<Option<i32>>(connection)?;
            Ok(max.map(OrderKey::new).transpose()?)
        })
        .await
    }

    async fn list_by_column(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Vec<WorkItem>> {
        self.run_blocking(move |connection| load_items(connection, board_id, column_id))
            .await
    }

    async fn list_by_board(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<WorkItem>> {
        self.run_blocking(move |connection| {
            work_items::table
                .filter(work_items::board_id.eq(board_id.into_inner()))
                .order(work_items::created_at.asc())
                .select(WorkItemRow::as_select())
                .load::<WorkItemRow>(connection)?
                .into_iter()
                .map(WorkItem::try_from)
                .collect()
        })
        .await
    }
}

fn constraint_is(info: &dyn DatabaseErrorInformation, name: &str) -> bool {
    info.constraint_name().is_some_and(|constraint| constraint == name)
}

fn map_column_write(err: DieselError, board_id: BoardId) -> BoardRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if constraint_is(info.as_ref(), ORDER_UNIQUE_INDEX) =>
        {
            BoardRepositoryError::OrderKeyConflict(board_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if constraint_is(info.as_ref(), NAME_UNIQUE_INDEX) =>
        {
            BoardRepositoryError::DuplicateColumnName(board_id)
        }
        _ => BoardRepositoryError::persistence(err),
    }
}

/// Locks the board row so concurrent reorders of the same board serialize.
fn lock_board(connection: &mut PgConnection, board_id: BoardId) -> BoardRepositoryResult<BoardRow> {
    boards::table
        .find(board_id.into_inner())
        .select(BoardRow::as_select())
        .for_update()
        .first::<BoardRow>(connection)
        .optional()?
        .ok_or(BoardRepositoryError::BoardNotFound(board_id))
}

fn load_columns(
    connection: &mut PgConnection,
    board_id: BoardId,
) -> BoardRepositoryResult<ColumnSequence> {
    let columns = board_columns::table
        .filter(board_columns::board_id.eq(board_id.into_inner()))
        .order(board_columns::order_key.asc())
        .select(ColumnRow::as_select())
        .load::<ColumnRow>(connection)?
        .into_iter()
        .map(BoardColumn::try_from)
        .collect::<BoardRepositoryResult<Vec<_>>>()?;
    Ok(ColumnSequence::new(columns))
}

fn insert_column_row(
    connection: &mut PgConnection,
    board_id: BoardId,
    row: &ColumnRow,
) -> BoardRepositoryResult<()> {
    diesel::insert_into(board_columns::table)
        .values(row)
        .execute(connection)
        .map_err(|err| map_column_write(err, board_id))?;
    Ok(())
}

fn write_column_key(
    connection: &mut PgConnection,
    board_id: BoardId,
    column_id: ColumnId,
    key: OrderKey,
) -> BoardRepositoryResult<()> {
    let updated = diesel::update(board_columns::table.find(column_id.into_inner()))
        .set(board_columns::order_key.eq(key.value()))
        .execute(connection)
        .map_err(|err| map_column_write(err, board_id))?;
    if updated == 0 {
        return Err(BoardRepositoryError::ColumnNotFound(column_id));
    }
    Ok(())
}

fn write_board_pointers(connection: &mut PgConnection, board: &Board) -> BoardRepositoryResult<()> {
    diesel::update(boards::table.find(board.id().into_inner()))
        .set((
            boards::default_column_id.eq(board.default_column_id().map(ColumnId::into_inner)),
            boards::done_column_id.eq(board.done_column_id().map(ColumnId::into_inner)),
            boards::updated_at.eq(board.updated_at()),
        ))
        .execute(connection)?;
    Ok(())
}

/// Applies both renumber phases to a board whose row is already locked.
fn renumber(
    connection: &mut PgConnection,
    board_id: BoardId,
    desired: &[ColumnId],
    inserted: Option<&BoardColumn>,
) -> BoardRepositoryResult<Vec<BoardColumn>> {
    let current = load_columns(connection, board_id)?;
    if !current.matches_order(desired, inserted.map(BoardColumn::id)) {
        return Err(BoardRepositoryError::StaleOrdering(board_id));
    }
    let plan = RenumberPlan::build(&current.entries(), desired)?;

    for assignment in plan.temporary() {
        match inserted.filter(|column| column.id() == assignment.id) {
            Some(column) => {
                let mut row = ColumnRow::from(column);
                row.order_key = assignment.key.value();
                insert_column_row(connection, board_id, &row)?;
            }
            None => write_column_key(connection, board_id, assignment.id, assignment.key)?,
        }
    }
    for assignment in plan.target() {
        write_column_key(connection, board_id, assignment.id, assignment.key)?;
    }
    Ok(load_columns(connection, board_id)?.into_vec())
}

fn load_items(
    connection: &mut PgConnection,
    board_id: BoardId,
    column_id: ColumnId,
) -> BoardRepositoryResult<Vec<WorkItem>> {
    work_items::table
        .filter(work_items::board_id.eq(board_id.into_inner()))
        .filter(work_items::column_id.eq(column_id.into_inner()))
        .order((work_items::order_key.asc(), work_items::created_at.asc()))
        .select(WorkItemRow::as_select())
        .load::<WorkItemRow>(connection)?
        .into_iter()
        .map(WorkItem::try_from)
        .collect()
}

fn count_items(
    connection: &mut PgConnection,
    board_id: BoardId,
    column_id: ColumnId,
) -> BoardRepositoryResult<usize> {
    let count: i64 = work_items::table
        .filter(work_items::board_id.eq(board_id.into_inner()))
        .filter(work_items::column_id.eq(column_id.into_inner()))
        .count()
        .get_result(connection)?;
    usize::try_from(count).map_err(BoardRepositoryError::persistence)
}

fn reassign_items(
    connection: &mut PgConnection,
    board_id: BoardId,
    from: ColumnId,
    to: ColumnId,
    at: DateTime<Utc>,
) -> BoardRepositoryResult<()> {
    let moving = load_items(connection, board_id, from)?;
    let target_max = work_items::table
        .filter(work_items::board_id.eq(board_id.into_inner()))
        .filter(work_items::column_id.eq(to.into_inner()))
        .select(diesel::dsl::max(work_items::order_key))
        .first::<Option<i32>>(connection)?
        .map(OrderKey::new)
        .transpose()?;
    let keys = append_run(target_max, moving.len())?;
    for (item, key) in moving.iter().zip(keys) {
        diesel::update(work_items::table.find(item.id().into_inner()))
            .set((
                work_items::column_id.eq(to.into_inner()),
                work_items::order_key.eq(key.value()),
                work_items::updated_at.eq(at),
            ))
            .execute(connection)?;
    }
    Ok(())
}
