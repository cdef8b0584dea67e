//! In-memory board store for tests and embedded use.
//!
//! The store enforces the relational unique indexes on every individual row
//! write, so an operation that would transiently collide fails here exactly as
//! it would against `PostgreSQL`. Each port method runs against a copy of the
//! state that replaces the shared state only when the method succeeds.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

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

/// Thread-safe in-memory store implementing both board ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardStore {
    state: Arc<RwLock<BoardState>>,
}

#[derive(Debug, Clone, Default)]
struct BoardState {
    boards: HashMap<BoardId, Board>,
    columns: HashMap<ColumnId, BoardColumn>,
    items: HashMap<WorkItemId, WorkItem>,
    column_writes: usize,
}

impl InMemoryBoardStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many column rows have been written (inserted or re-keyed)
    /// since the store was created.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the lock is poisoned.
    pub fn column_writes(&self) -> BoardRepositoryResult<usize> {
        self.read(|state| Ok(state.column_writes))
    }

    fn read<T>(
        &self,
        f: impl FnOnce(&BoardState) -> BoardRepositoryResult<T>,
    ) -> BoardRepositoryResult<T> {
        let state = self.state.read().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        f(&state)
    }

    fn transact<T>(
        &self,
        f: impl FnOnce(&mut BoardState) -> BoardRepositoryResult<T>,
    ) -> BoardRepositoryResult<T> {
        let mut state = self.state.write().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut working = state.clone();
        let value = f(&mut working)?;
        *state = working;
        Ok(value)
    }
}

impl BoardState {
    fn board(&self, board_id: BoardId) -> BoardRepositoryResult<&Board> {
        self.boards
            .get(&board_id)
            .ok_or(BoardRepositoryError::BoardNotFound(board_id))
    }

    fn ordered_columns(&self, board_id: BoardId) -> ColumnSequence {
        ColumnSequence::new(
            self.columns
                .values()
                .filter(|column| column.board_id() == board_id)
                .cloned()
                .collect(),
        )
    }

    fn column_on_board(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<&BoardColumn> {
        self.columns
            .get(&column_id)
            .filter(|column| column.board_id() == board_id)
            .ok_or(BoardRepositoryError::ColumnNotFound(column_id))
    }

    fn ordered_items(&self, board_id: BoardId, column_id: ColumnId) -> Vec<WorkItem> {
        let mut items: Vec<WorkItem> = self
            .items
            .values()
            .filter(|item| item.board_id() == board_id && item.column_id() == column_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.order_key(), item.created_at()));
        items
    }

    /// Writes one column row, checking both per-board unique indexes.
    fn write_column(&mut self, column: BoardColumn) -> BoardRepositoryResult<()> {
        let board_id = column.board_id();
        let clash = self
            .columns
            .values()
            .filter(|other| other.board_id() == board_id && other.id() != column.id());
        for other in clash {
            if other.order_key() == column.order_key() {
                return Err(BoardRepositoryError::OrderKeyConflict(board_id));
            }
            if other.name().eq_ignore_case(column.name()) {
                return Err(BoardRepositoryError::DuplicateColumnName(board_id));
            }
        }
        self.columns.insert(column.id(), column);
        self.column_writes += 1;
        Ok(())
    }

    fn write_column_key(
        &mut self,
        column_id: ColumnId,
        key: OrderKey,
    ) -> BoardRepositoryResult<()> {
        let mut column = self
            .columns
            .get(&column_id)
            .cloned()
            .ok_or(BoardRepositoryError::ColumnNotFound(column_id))?;
        column.reposition(key);
        self.write_column(column)
    }

    /// Applies both renumber phases to a board's columns.
    fn renumber(
        &mut self,
        board_id: BoardId,
        desired: &[ColumnId],
        mut inserted: Option<BoardColumn>,
    ) -> BoardRepositoryResult<Vec<BoardColumn>> {
        let current = self.ordered_columns(board_id);
        if !current.matches_order(desired, inserted.as_ref().map(BoardColumn::id)) {
            return Err(BoardRepositoryError::StaleOrdering(board_id));
        }
        let plan = RenumberPlan::build(&current.entries(), desired)?;

        for assignment in plan.temporary() {
            match inserted.take_if(|column| column.id() == assignment.id) {
                Some(mut column) => {
                    column.reposition(assignment.key);
                    self.write_column(column)?;
                }
                None => self.write_column_key(assignment.id, assignment.key)?,
            }
        }
        for assignment in plan.target() {
            self.write_column_key(assignment.id, assignment.key)?;
        }
        Ok(self.ordered_columns(board_id).into_vec())
    }

    fn reassign_items(
        &mut self,
        board_id: BoardId,
        from: ColumnId,
        to: ColumnId,
        removal: &ColumnRemoval,
    ) -> BoardRepositoryResult<()> {
        if to == from {
            return Err(BoardRepositoryError::ColumnNotFound(to));
        }
        self.column_on_board(board_id, to)?;
        let moving = self.ordered_items(board_id, from);
        let target_max = self
            .ordered_items(board_id, to)
            .iter()
            .map(WorkItem::order_key)
            .max();
        let keys = append_run(target_max, moving.len())?;
        for (mut item, key) in moving.into_iter().zip(keys) {
            item.relocate(to, key, removal.requested_at);
            self.items.insert(item.id(), item);
        }
        Ok(())
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardStore {
    async fn find_board_by_project(
        &self,
        project_id: ProjectId,
    ) -> BoardRepositoryResult<Option<Board>> {
        self.read(|state| {
            Ok(state
                .boards
                .values()
                .find(|board| board.project_id() == project_id)
                .cloned())
        })
    }

    async fn find_board(&self, board_id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        self.read(|state| Ok(state.boards.get(&board_id).cloned()))
    }

    async fn create_board(
        &self,
        board: &Board,
        columns: &[BoardColumn],
    ) -> BoardRepositoryResult<()> {
        self.transact(|state| {
            let taken = state
                .boards
                .values()
                .any(|existing| existing.project_id() == board.project_id());
            if taken {
                return Err(BoardRepositoryError::DuplicateBoard(board.project_id()));
            }
            state.boards.insert(board.id(), board.clone());
            for column in columns {
                state.write_column(column.clone())?;
            }
            Ok(())
        })
    }

    async fn seed_columns(
        &self,
        board: &Board,
        columns: &[BoardColumn],
    ) -> BoardRepositoryResult<()> {
        self.transact(|state| {
            state.board(board.id())?;
            if !state.ordered_columns(board.id()).is_empty() {
                return Err(BoardRepositoryError::StaleOrdering(board.id()));
            }
            for column in columns {
                state.write_column(column.clone())?;
            }
            state.boards.insert(board.id(), board.clone());
            Ok(())
        })
    }

    async fn list_columns(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<BoardColumn>> {
        self.read(|state| Ok(state.ordered_columns(board_id).into_vec()))
    }

    async fn insert_column(&self, column: &BoardColumn) -> BoardRepositoryResult<()> {
        self.transact(|state| {
            state.board(column.board_id())?;
            state.write_column(column.clone())
        })
    }

    async fn update_column(&self, column: &BoardColumn) -> BoardRepositoryResult<()> {
        self.transact(|state| {
            let stored = state.column_on_board(column.board_id(), column.id())?;
            let mut updated = column.clone();
            updated.reposition(stored.order_key());
            state.write_column(updated)
        })
    }

    async fn reorder_columns(
        &self,
        board_id: BoardId,
        desired: Vec<ColumnId>,
        inserted: Option<BoardColumn>,
    ) -> BoardRepositoryResult<Vec<BoardColumn>> {
        self.transact(|state| {
            state.board(board_id)?;
            state.renumber(board_id, &desired, inserted)
        })
    }

    async fn remove_column(
        &self,
        removal: ColumnRemoval,
    ) -> BoardRepositoryResult<Vec<BoardColumn>> {
        self.transact(|state| {
            let board_id = removal.board.id();
            state.board(board_id)?;
            state.column_on_board(board_id, removal.column_id)?;

            match removal.items {
                ItemDisposition::RequireEmpty => {
                    let count = state.ordered_items(board_id, removal.column_id).len();
                    if count > 0 {
                        return Err(BoardRepositoryError::ColumnNotEmpty {
                            column_id: removal.column_id,
                            count,
                        });
                    }
                }
                ItemDisposition::ReassignTo(target) => {
                    state.reassign_items(board_id, removal.column_id, target, &removal)?;
                }
            }

            state.columns.remove(&removal.column_id);
            state.boards.insert(board_id, removal.board.clone());
            state.renumber(board_id, &removal.remaining_order, None)
        })
    }
}

#[async_trait]
impl WorkItemRepository for InMemoryBoardStore {
    async fn store(&self, item: &WorkItem) -> BoardRepositoryResult<()> {
        self.transact(|state| {
            state.column_on_board(item.board_id(), item.column_id())?;
            state.items.insert(item.id(), item.clone());
            Ok(())
        })
    }

    async fn update(&self, item: &WorkItem) -> BoardRepositoryResult<()> {
        self.transact(|state| {
            if !state.items.contains_key(&item.id()) {
                return Err(BoardRepositoryError::WorkItemNotFound(item.id()));
            }
            state.column_on_board(item.board_id(), item.column_id())?;
            state.items.insert(item.id(), item.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: WorkItemId) -> BoardRepositoryResult<Option<WorkItem>> {
        self.read(|state| Ok(state.items.get(&id).cloned()))
    }

    async fn delete(&self, id: WorkItemId) -> BoardRepositoryResult<()> {
        self.transact(|state| {
            state
                .items
                .remove(&id)
                .map(|_| ())
                .ok_or(BoardRepositoryError::WorkItemNotFound(id))
        })
    }

    async fn max_order_key(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Option<OrderKey>> {
        self.read(|state| {
            Ok(state
                .items
                .values()
                .filter(|item| item.board_id() == board_id && item.column_id() == column_id)
                .map(WorkItem::order_key)
                .max())
        })
    }

    async fn list_by_column(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Vec<WorkItem>> {
        self.read(|state| Ok(state.ordered_items(board_id, column_id)))
    }

    async fn list_by_board(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<WorkItem>> {
        self.read(|state| {
            let mut items: Vec<WorkItem> = state
                .items
                .values()
                .filter(|item| item.board_id() == board_id)
                .cloned()
                .collect();
            items.sort_by_key(WorkItem::created_at);
            Ok(items)
        })
    }
}
