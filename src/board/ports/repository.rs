//! Repository ports for boards, ordered columns and work items.

use crate::board::domain::{
    Board, BoardColumn, BoardId, ColumnId, OrderKey, OrderKeyError, ProjectId, WorkItem,
    WorkItemId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// What happens to the work items of a column being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDisposition {
    /// Refuse the removal while the column still holds items.
    RequireEmpty,
    /// Append the column's items, in their current order, to another column.
    ReassignTo(ColumnId),
}

/// Atomic removal of a column followed by key compaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRemoval {
    /// Board state to persist alongside the removal (pointer updates).
    pub board: Board,
    /// Column to remove.
    pub column_id: ColumnId,
    /// Policy for the column's work items.
    pub items: ItemDisposition,
    /// Desired order of the remaining columns.
    pub remaining_order: Vec<ColumnId>,
    /// Timestamp stamped on reassigned work items.
    pub requested_at: DateTime<Utc>,
}

/// Board and column persistence contract.
///
/// Every method runs as one transaction. Implementations enforce that
/// `(board_id, order_key)` and `(board_id, lower(name))` are unique on every
/// individual row write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Finds the board owned by `project_id`.
    async fn find_board_by_project(
        &self,
        project_id: ProjectId,
    ) -> BoardRepositoryResult<Option<Board>>;

    /// Finds a board by identifier.
    async fn find_board(&self, board_id: BoardId) -> BoardRepositoryResult<Option<Board>>;

    /// Stores a new board together with its initial columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateBoard`] when the project
    /// already owns a board.
    async fn create_board(
        &self,
        board: &Board,
        columns: &[BoardColumn],
    ) -> BoardRepositoryResult<()>;

    /// Stores seed columns for an existing board whose column set is empty
    /// and persists the board's updated pointers.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::StaleOrdering`] when the board already
    /// has columns.
    async fn seed_columns(
        &self,
        board: &Board,
        columns: &[BoardColumn],
    ) -> BoardRepositoryResult<()>;

    /// Lists a board's columns ascending by order key.
    async fn list_columns(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<BoardColumn>>;

    /// Inserts a column with the key it already carries.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateColumnName`] or
    /// [`BoardRepositoryError::OrderKeyConflict`] on unique-index violations.
    async fn insert_column(&self, column: &BoardColumn) -> BoardRepositoryResult<()>;

    /// Persists a column's name and attributes. The order key is not written.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::ColumnNotFound`] when the column does
    /// not exist.
    async fn update_column(&self, column: &BoardColumn) -> BoardRepositoryResult<()>;

    /// Reorders a board's columns with the two-phase renumbering algorithm,
    /// optionally inserting `inserted` at its place in `desired`.
    ///
    /// Returns the columns in their final order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::StaleOrdering`] when `desired` does not
    /// match the stored columns (plus `inserted`).
    async fn reorder_columns(
        &self,
        board_id: BoardId,
        desired: Vec<ColumnId>,
        inserted: Option<BoardColumn>,
    ) -> BoardRepositoryResult<Vec<BoardColumn>>;

    /// Removes a column, disposes of its items and compacts the remaining
    /// keys, all in one transaction.
    ///
    /// Returns the remaining columns in order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::ColumnNotEmpty`] under
    /// [`ItemDisposition::RequireEmpty`] when items remain.
    async fn remove_column(
        &self,
        removal: ColumnRemoval,
    ) -> BoardRepositoryResult<Vec<BoardColumn>>;
}

/// Work item persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    /// Stores a new work item.
    async fn store(&self, item: &WorkItem) -> BoardRepositoryResult<()>;

    /// Persists placement and timestamp changes of an existing item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::WorkItemNotFound`] when absent.
    async fn update(&self, item: &WorkItem) -> BoardRepositoryResult<()>;

    /// Finds a work item by identifier.
    async fn find_by_id(&self, id: WorkItemId) -> BoardRepositoryResult<Option<WorkItem>>;

    /// Deletes a work item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::WorkItemNotFound`] when absent.
    async fn delete(&self, id: WorkItemId) -> BoardRepositoryResult<()>;

    /// Returns the largest order key in a column, if it holds any items.
    async fn max_order_key(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Option<OrderKey>>;

    /// Lists a column's items ascending by order key.
    async fn list_by_column(
        &self,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Vec<WorkItem>>;

    /// Lists every item on a board.
    async fn list_by_board(&self, board_id: BoardId) -> BoardRepositoryResult<Vec<WorkItem>>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// The project already owns a board.
    #[error("project {0} already has a board")]
    DuplicateBoard(ProjectId),

    /// Another column on the board has the same name, ignoring case.
    #[error("duplicate column name on board {0}")]
    DuplicateColumnName(BoardId),

    /// Another column on the board already uses the order key.
    #[error("order key already in use on board {0}")]
    OrderKeyConflict(BoardId),

    /// The board does not exist.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The column does not exist on the board.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The work item does not exist.
    #[error("work item not found: {0}")]
    WorkItemNotFound(WorkItemId),

    /// The column still holds work items.
    #[error("column {column_id} still holds {count} work items")]
    ColumnNotEmpty {
        /// Column that was to be removed.
        column_id: ColumnId,
        /// Number of items still in the column.
        count: usize,
    },

    /// The stored columns changed since the caller read them.
    #[error("column order of board {0} changed concurrently")]
    StaleOrdering(BoardId),

    /// Stored keys could not be renumbered.
    #[error(transparent)]
    OrderKey(#[from] OrderKeyError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
