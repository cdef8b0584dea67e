//! Board resolution, lazy creation and reporting.

use super::error::{BoardServiceError, BoardServiceResult};
use crate::access::ActingUser;
use crate::board::{
    domain::{
        Board, BoardColumn, BoardId, BoardSummary, ColumnSequence, DEFAULT_SUMMARY_DAYS, ProjectId,
    },
    ports::{BoardRepository, BoardRepositoryError, WorkItemRepository},
};
use crate::config::ServiceConfig;
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Board with its columns in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    /// The board.
    pub board: Board,
    /// Columns ascending by order key.
    pub columns: Vec<BoardColumn>,
}

/// Resolves the project's board, creating and seeding it on first access.
pub(super) async fn ensure_board<R, C>(
    repository: &R,
    clock: &C,
    project_id: ProjectId,
    actor: &ActingUser,
) -> BoardServiceResult<(Board, ColumnSequence)>
where
    R: BoardRepository + ?Sized,
    C: Clock + Send + Sync,
{
    if let Some(board) = repository.find_board_by_project(project_id).await? {
        let columns = ColumnSequence::new(repository.list_columns(board.id()).await?);
        return Ok((board, columns));
    }

    let mut board = Board::new(project_id, actor.user_id(), clock);
    let seeded = board.seed_columns(clock)?;
    match repository.create_board(&board, &seeded).await {
        Ok(()) => {
            info!(
                project_id = %project_id,
                board_id = %board.id(),
                actor = %actor,
                "board created with default columns"
            );
            Ok((board, ColumnSequence::new(seeded)))
        }
        Err(BoardRepositoryError::DuplicateBoard(_)) => {
            let existing = repository
                .find_board_by_project(project_id)
                .await?
                .ok_or(BoardServiceError::NoBoardForProject(project_id))?;
            let columns = ColumnSequence::new(repository.list_columns(existing.id()).await?);
            Ok((existing, columns))
        }
        Err(err) => Err(err.into()),
    }
}

/// Resolves the project's existing board.
pub(super) async fn existing_board<R>(
    repository: &R,
    project_id: ProjectId,
) -> BoardServiceResult<Board>
where
    R: BoardRepository + ?Sized,
{
    repository
        .find_board_by_project(project_id)
        .await?
        .ok_or(BoardServiceError::NoBoardForProject(project_id))
}

/// Resolves a board and checks that it belongs to `project_id`.
pub(super) async fn scoped_board<R>(
    repository: &R,
    project_id: ProjectId,
    board_id: BoardId,
) -> BoardServiceResult<Board>
where
    R: BoardRepository + ?Sized,
{
    repository
        .find_board(board_id)
        .await?
        .filter(|board| board.project_id() == project_id)
        .ok_or(BoardServiceError::BoardNotFound(board_id))
}

/// Board access and summary service.
#[derive(Clone)]
pub struct BoardService<R, W, C>
where
    R: BoardRepository,
    W: WorkItemRepository,
    C: Clock + Send + Sync,
{
    boards: Arc<R>,
    items: Arc<W>,
    clock: Arc<C>,
    summary_window_days: i64,
}

impl<R, W, C> BoardService<R, W, C>
where
    R: BoardRepository,
    W: WorkItemRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(boards: Arc<R>, items: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            boards,
            items,
            clock,
            summary_window_days: DEFAULT_SUMMARY_DAYS,
        }
    }

    /// Creates a board service using the configured summary window.
    #[must_use]
    pub const fn from_config(
        boards: Arc<R>,
        items: Arc<W>,
        clock: Arc<C>,
        config: &ServiceConfig,
    ) -> Self {
        Self::new(boards, items, clock).with_summary_window(config.summary_window_days)
    }

    /// Sets the window used when a summary request omits it.
    #[must_use]
    pub const fn with_summary_window(mut self, days: i64) -> Self {
        self.summary_window_days = days;
        self
    }

    /// Returns the project's board with its ordered columns.
    ///
    /// Creates a board named `Default` on first access, and seeds the
    /// `To Do`, `Doing` and `Done` columns whenever the column set is empty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] when persistence fails.
    pub async fn get_board(
        &self,
        actor: &ActingUser,
        project_id: ProjectId,
    ) -> BoardServiceResult<BoardView> {
        let (mut board, columns) =
            ensure_board(&*self.boards, &*self.clock, project_id, actor).await?;
        if !columns.is_empty() {
            return Ok(BoardView {
                board,
                columns: columns.into_vec(),
            });
        }

        let seeded = board.seed_columns(&*self.clock)?;
        match self.boards.seed_columns(&board, &seeded).await {
            Ok(()) => {
                info!(
                    project_id = %project_id,
                    board_id = %board.id(),
                    actor = %actor,
                    "default columns reseeded"
                );
                Ok(BoardView {
                    board,
                    columns: seeded,
                })
            }
            Err(BoardRepositoryError::StaleOrdering(_)) => {
                let current = scoped_board(&*self.boards, project_id, board.id()).await?;
                let columns = self.boards.list_columns(current.id()).await?;
                Ok(BoardView {
                    board: current,
                    columns,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Summarizes activity on a board over the trailing `days`.
    ///
    /// `None` uses the configured window; zero or negative values fall back
    /// to seven days.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::BoardNotFound`] when the board does not
    /// belong to the project, or a repository error.
    pub async fn summary(
        &self,
        project_id: ProjectId,
        board_id: BoardId,
        days: Option<i64>,
    ) -> BoardServiceResult<BoardSummary> {
        let board = scoped_board(&*self.boards, project_id, board_id).await?;
        let columns = ColumnSequence::new(self.boards.list_columns(board_id).await?);
        let items = self.items.list_by_board(board_id).await?;
        Ok(BoardSummary::compute(
            &board,
            &columns,
            &items,
            days.unwrap_or(self.summary_window_days),
            self.clock.utc(),
        ))
    }
}
