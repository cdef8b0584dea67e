//! Column ordering service: add, move, rename and delete board columns.

use super::{
    board::{ensure_board, existing_board},
    error::{BoardServiceError, BoardServiceResult},
};
use crate::access::ActingUser;
use crate::board::{
    domain::{
        BoardColumn, ColumnId, ColumnName, ColumnPlacement, ColumnSequence, OrderKey, ProjectId,
        WipLimit, normalize_color,
    },
    ports::{BoardRepository, ColumnRemoval, ItemDisposition},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for adding a column to a project's board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumnRequest {
    project_id: ProjectId,
    name: String,
    color: Option<String>,
    wip_limit: Option<i64>,
    is_done_like: bool,
    insert_after: Option<ColumnId>,
}

impl AddColumnRequest {
    /// Creates a request that appends a column named `name`.
    #[must_use]
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            color: None,
            wip_limit: None,
            is_done_like: false,
            insert_after: None,
        }
    }

    /// Sets the display colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the WIP limit.
    #[must_use]
    pub const fn with_wip_limit(mut self, wip_limit: i64) -> Self {
        self.wip_limit = Some(wip_limit);
        self
    }

    /// Marks the column as representing completed work.
    #[must_use]
    pub const fn done_like(mut self) -> Self {
        self.is_done_like = true;
        self
    }

    /// Inserts the column directly after `column_id`.
    #[must_use]
    pub const fn after(mut self, column_id: ColumnId) -> Self {
        self.insert_after = Some(column_id);
        self
    }
}

/// Request payload for moving a column to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveColumnRequest {
    project_id: ProjectId,
    column_id: ColumnId,
    target_index: i64,
}

impl MoveColumnRequest {
    /// Creates a request moving `column_id` to `target_index`.
    ///
    /// The index is clamped: negative values mean first, values past the end
    /// mean last.
    #[must_use]
    pub const fn new(project_id: ProjectId, column_id: ColumnId, target_index: i64) -> Self {
        Self {
            project_id,
            column_id,
            target_index,
        }
    }
}

/// Request payload for renaming a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameColumnRequest {
    project_id: ProjectId,
    column_id: ColumnId,
    name: String,
}

impl RenameColumnRequest {
    /// Creates a rename request.
    #[must_use]
    pub fn new(project_id: ProjectId, column_id: ColumnId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            column_id,
            name: name.into(),
        }
    }
}

/// Request payload for deleting a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteColumnRequest {
    project_id: ProjectId,
    column_id: ColumnId,
    items: ItemDisposition,
}

impl DeleteColumnRequest {
    /// Creates a request that deletes `column_id` only if it holds no items.
    #[must_use]
    pub const fn new(project_id: ProjectId, column_id: ColumnId) -> Self {
        Self {
            project_id,
            column_id,
            items: ItemDisposition::RequireEmpty,
        }
    }

    /// Moves the column's items to the end of `fallback` instead of
    /// refusing the deletion.
    #[must_use]
    pub const fn reassigning_items_to(mut self, fallback: ColumnId) -> Self {
        self.items = ItemDisposition::ReassignTo(fallback);
        self
    }
}

/// Orchestrates column ordering on a project's board.
#[derive(Clone)]
pub struct ColumnOrderingService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ColumnOrderingService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new column ordering service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Adds a column, creating the project's board on first use.
    ///
    /// With an anchor that has a free key after it the column is written in
    /// a single insert; otherwise the whole board is renumbered with the new
    /// column in place. A missing or unknown anchor appends.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for invalid input or
    /// [`BoardServiceError::DuplicateColumnName`] when the name is taken.
    pub async fn add_column(
        &self,
        actor: &ActingUser,
        request: AddColumnRequest,
    ) -> BoardServiceResult<BoardColumn> {
        let name = ColumnName::new(request.name)?;
        let color = normalize_color(request.color)?;
        let wip_limit = request.wip_limit.map(WipLimit::new).transpose()?;

        let (board, columns) =
            ensure_board(&*self.repository, &*self.clock, request.project_id, actor).await?;
        if columns.name_clash(&name, None).is_some() {
            return Err(BoardServiceError::DuplicateColumnName(name.to_string()));
        }

        let mut column = BoardColumn::new(board.id(), name, OrderKey::FIRST)
            .with_color(color)
            .with_wip_limit(wip_limit)
            .with_done_like(request.is_done_like);

        match columns.plan_insert(column.id(), request.insert_after)? {
            ColumnPlacement::Direct(key) => {
                debug!(board_id = %board.id(), order_key = %key, "column fits without renumbering");
                column.reposition(key);
                self.repository.insert_column(&column).await?;
            }
            ColumnPlacement::Renumber(order) => {
                warn!(
                    board_id = %board.id(),
                    columns = order.len(),
                    "no free order key after anchor, renumbering board"
                );
                let ordered = self
                    .repository
                    .reorder_columns(board.id(), order, Some(column.clone()))
                    .await?;
                column = ordered
                    .into_iter()
                    .find(|stored| stored.id() == column.id())
                    .ok_or(BoardServiceError::ColumnNotFound(column.id()))?;
            }
        }

        info!(
            project_id = %request.project_id,
            board_id = %board.id(),
            column_id = %column.id(),
            order_key = %column.order_key(),
            actor = %actor,
            "column added"
        );
        Ok(column)
    }

    /// Moves a column and renumbers the board.
    ///
    /// Returns the columns in their new order.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the board or column is absent.
    pub async fn move_column(
        &self,
        actor: &ActingUser,
        request: MoveColumnRequest,
    ) -> BoardServiceResult<Vec<BoardColumn>> {
        let board = existing_board(&*self.repository, request.project_id).await?;
        let columns = ColumnSequence::new(self.repository.list_columns(board.id()).await?);
        let order = columns
            .order_after_move(request.column_id, request.target_index)
            .ok_or(BoardServiceError::ColumnNotFound(request.column_id))?;

        let ordered = self
            .repository
            .reorder_columns(board.id(), order, None)
            .await?;
        info!(
            project_id = %request.project_id,
            board_id = %board.id(),
            column_id = %request.column_id,
            target_index = request.target_index,
            actor = %actor,
            "column moved"
        );
        Ok(ordered)
    }

    /// Renames a column without changing its position.
    ///
    /// Renaming to the identical current name succeeds without a write.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for an invalid name,
    /// [`BoardServiceError::DuplicateColumnName`] when another column uses it,
    /// or a not-found error.
    pub async fn rename_column(
        &self,
        actor: &ActingUser,
        request: RenameColumnRequest,
    ) -> BoardServiceResult<BoardColumn> {
        let name = ColumnName::new(request.name)?;
        let board = existing_board(&*self.repository, request.project_id).await?;
        let columns = ColumnSequence::new(self.repository.list_columns(board.id()).await?);
        let mut column = columns
            .find(request.column_id)
            .cloned()
            .ok_or(BoardServiceError::ColumnNotFound(request.column_id))?;

        if column.name() == &name {
            return Ok(column);
        }
        if columns.name_clash(&name, Some(column.id())).is_some() {
            return Err(BoardServiceError::DuplicateColumnName(name.to_string()));
        }

        column.rename(name);
        self.repository.update_column(&column).await?;
        info!(
            project_id = %request.project_id,
            board_id = %board.id(),
            column_id = %column.id(),
            actor = %actor,
            "column renamed"
        );
        Ok(column)
    }

    /// Deletes a column and compacts the remaining keys.
    ///
    /// Returns the remaining columns in order.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the board, column or fallback column
    /// is absent, or a conflict when the column still holds items and no
    /// fallback was named.
    pub async fn delete_column(
        &self,
        actor: &ActingUser,
        request: DeleteColumnRequest,
    ) -> BoardServiceResult<Vec<BoardColumn>> {
        let mut board = existing_board(&*self.repository, request.project_id).await?;
        let columns = ColumnSequence::new(self.repository.list_columns(board.id()).await?);
        if columns.find(request.column_id).is_none() {
            return Err(BoardServiceError::ColumnNotFound(request.column_id));
        }
        if let ItemDisposition::ReassignTo(fallback) = request.items {
            if fallback == request.column_id {
                return Err(BoardServiceError::InvalidFallbackColumn(fallback));
            }
            if columns.find(fallback).is_none() {
                return Err(BoardServiceError::ColumnNotFound(fallback));
            }
        }

        board.forget_column(request.column_id, &*self.clock);
        let board_id = board.id();
        let removal = ColumnRemoval {
            board,
            column_id: request.column_id,
            items: request.items,
            remaining_order: columns.order_without(request.column_id),
            requested_at: self.clock.utc(),
        };
        let remaining = self.repository.remove_column(removal).await?;
        info!(
            project_id = %request.project_id,
            board_id = %board_id,
            column_id = %request.column_id,
            actor = %actor,
            "column deleted"
        );
        Ok(remaining)
    }
}
