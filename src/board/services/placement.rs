//! Work item placement: creation, movement and removal within a board.

use super::{
    board::scoped_board,
    error::{BoardServiceError, BoardServiceResult},
};
use crate::access::ActingUser;
use crate::board::{
    domain::{
        Board, BoardColumn, BoardId, ColumnId, ColumnSequence, Level, NewWorkItem, ProjectId,
        UserId, WorkItem, WorkItemId, WorkItemTitle, WorkItemType, order_key::append_key,
    },
    ports::{BoardRepository, WorkItemRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkItemRequest {
    project_id: ProjectId,
    board_id: BoardId,
    column_id: Option<ColumnId>,
    title: String,
    description: Option<String>,
    item_type: Option<String>,
    priority: Option<u8>,
    severity: Option<u8>,
    assignee_id: Option<UserId>,
}

impl CreateWorkItemRequest {
    /// Creates a request for a titled item in the board's default column.
    #[must_use]
    pub fn new(project_id: ProjectId, board_id: BoardId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            board_id,
            column_id: None,
            title: title.into(),
            description: None,
            item_type: None,
            priority: None,
            severity: None,
            assignee_id: None,
        }
    }

    /// Places the item in `column_id`.
    #[must_use]
    pub const fn in_column(mut self, column_id: ColumnId) -> Self {
        self.column_id = Some(column_id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the type; blank values fall back to `Task`.
    #[must_use]
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Sets the priority (1 to 5).
    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the severity (1 to 5).
    #[must_use]
    pub const fn with_severity(mut self, severity: u8) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Assigns the item.
    #[must_use]
    pub const fn assigned_to(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }
}

/// Request payload for moving a work item to another column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveWorkItemRequest {
    project_id: ProjectId,
    board_id: BoardId,
    work_item_id: WorkItemId,
    target_column_id: ColumnId,
}

impl MoveWorkItemRequest {
    /// Creates a request moving `work_item_id` to the end of
    /// `target_column_id`.
    #[must_use]
    pub const fn new(
        project_id: ProjectId,
        board_id: BoardId,
        work_item_id: WorkItemId,
        target_column_id: ColumnId,
    ) -> Self {
        Self {
            project_id,
            board_id,
            work_item_id,
            target_column_id,
        }
    }
}

/// Places work items at the end of board columns.
#[derive(Clone)]
pub struct WorkItemPlacementService<R, W, C>
where
    R: BoardRepository,
    W: WorkItemRepository,
    C: Clock + Send + Sync,
{
    boards: Arc<R>,
    items: Arc<W>,
    clock: Arc<C>,
}

impl<R, W, C> WorkItemPlacementService<R, W, C>
where
    R: BoardRepository,
    W: WorkItemRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new placement service.
    #[must_use]
    pub const fn new(boards: Arc<R>, items: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            boards,
            items,
            clock,
        }
    }

    /// Creates a work item at the end of its column.
    ///
    /// The column is the requested one, else the board's default column,
    /// else the first column. The acting user becomes the reporter.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for invalid fields,
    /// [`BoardServiceError::NoColumnAvailable`] for a board without columns,
    /// or a not-found error for an unknown board or column.
    pub async fn create_work_item(
        &self,
        actor: &ActingUser,
        request: CreateWorkItemRequest,
    ) -> BoardServiceResult<WorkItem> {
        let title = WorkItemTitle::new(request.title)?;
        let item_type = request
            .item_type
            .map(WorkItemType::new)
            .transpose()?
            .unwrap_or_default();
        let priority = request
            .priority
            .map(|value| Level::new("priority", value))
            .transpose()?;
        let severity = request
            .severity
            .map(|value| Level::new("severity", value))
            .transpose()?;

        let board = scoped_board(&*self.boards, request.project_id, request.board_id).await?;
        let columns = ColumnSequence::new(self.boards.list_columns(board.id()).await?);
        let column_id = resolve_column(&board, &columns, request.column_id)?;
        let max = self.items.max_order_key(board.id(), column_id).await?;
        let order_key = append_key(max)?;

        let item = WorkItem::new(
            NewWorkItem {
                project_id: request.project_id,
                board_id: board.id(),
                column_id,
                title,
                description: request.description,
                item_type,
                priority,
                severity,
                reporter_id: actor.user_id(),
                assignee_id: request.assignee_id,
                order_key,
            },
            &*self.clock,
        );
        self.items.store(&item).await?;
        info!(
            project_id = %request.project_id,
            board_id = %board.id(),
            column_id = %column_id,
            work_item_id = %item.id(),
            order_key = %order_key,
            actor = %actor,
            "work item created"
        );
        Ok(item)
    }

    /// Moves a work item to the end of another column.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the board, item or target column is
    /// absent or belongs elsewhere.
    pub async fn move_work_item(
        &self,
        actor: &ActingUser,
        request: MoveWorkItemRequest,
    ) -> BoardServiceResult<WorkItem> {
        let board = scoped_board(&*self.boards, request.project_id, request.board_id).await?;
        let mut item = self.scoped_item(&board, request.work_item_id).await?;
        let columns = ColumnSequence::new(self.boards.list_columns(board.id()).await?);
        let target = columns
            .find(request.target_column_id)
            .map(BoardColumn::id)
            .ok_or(BoardServiceError::ColumnNotFound(request.target_column_id))?;

        let max = self.items.max_order_key(board.id(), target).await?;
        let order_key = append_key(max)?;
        item.place(target, order_key, &*self.clock);
        self.items.update(&item).await?;
        info!(
            project_id = %request.project_id,
            board_id = %board.id(),
            column_id = %target,
            work_item_id = %item.id(),
            order_key = %order_key,
            actor = %actor,
            "work item moved"
        );
        Ok(item)
    }

    /// Deletes a work item. Remaining keys are left untouched.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the board or item is absent.
    pub async fn delete_work_item(
        &self,
        actor: &ActingUser,
        project_id: ProjectId,
        board_id: BoardId,
        work_item_id: WorkItemId,
    ) -> BoardServiceResult<()> {
        let board = scoped_board(&*self.boards, project_id, board_id).await?;
        self.scoped_item(&board, work_item_id).await?;
        self.items.delete(work_item_id).await?;
        info!(
            project_id = %project_id,
            board_id = %board_id,
            work_item_id = %work_item_id,
            actor = %actor,
            "work item deleted"
        );
        Ok(())
    }

    /// Returns a work item on the board.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the board or item is absent.
    pub async fn get_work_item(
        &self,
        project_id: ProjectId,
        board_id: BoardId,
        work_item_id: WorkItemId,
    ) -> BoardServiceResult<WorkItem> {
        let board = scoped_board(&*self.boards, project_id, board_id).await?;
        self.scoped_item(&board, work_item_id).await
    }

    /// Lists a column's items in order.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the board or column is absent.
    pub async fn list_column_items(
        &self,
        project_id: ProjectId,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> BoardServiceResult<Vec<WorkItem>> {
        let board = scoped_board(&*self.boards, project_id, board_id).await?;
        let columns = ColumnSequence::new(self.boards.list_columns(board.id()).await?);
        if columns.find(column_id).is_none() {
            return Err(BoardServiceError::ColumnNotFound(column_id));
        }
        Ok(self.items.list_by_column(board.id(), column_id).await?)
    }

    async fn scoped_item(
        &self,
        board: &Board,
        work_item_id: WorkItemId,
    ) -> BoardServiceResult<WorkItem> {
        self.items
            .find_by_id(work_item_id)
            .await?
            .filter(|item| {
                item.board_id() == board.id() && item.project_id() == board.project_id()
            })
            .ok_or(BoardServiceError::WorkItemNotFound(work_item_id))
    }
}

fn resolve_column(
    board: &Board,
    columns: &ColumnSequence,
    requested: Option<ColumnId>,
) -> BoardServiceResult<ColumnId> {
    if let Some(column_id) = requested {
        return columns
            .find(column_id)
            .map(BoardColumn::id)
            .ok_or(BoardServiceError::ColumnNotFound(column_id));
    }
    board
        .default_column_id()
        .and_then(|id| columns.find(id))
        .or_else(|| columns.as_slice().iter().find(|column| column.is_default()))
        .or_else(|| columns.first())
        .map(BoardColumn::id)
        .ok_or(BoardServiceError::NoColumnAvailable(board.id()))
}
