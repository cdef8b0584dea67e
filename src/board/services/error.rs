//! Service-level errors and their caller-facing classification.

use crate::board::{
    domain::{BoardDomainError, BoardId, ColumnId, OrderKeyError, ProjectId, WorkItemId},
    ports::BoardRepositoryError,
};
use thiserror::Error;

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Errors returned by board services.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// Key allocation over the stored sequence failed.
    #[error(transparent)]
    OrderKey(#[from] OrderKeyError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),

    /// The project has no board yet.
    #[error("project {0} has no board")]
    NoBoardForProject(ProjectId),

    /// The board does not exist or belongs to another project.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The column does not exist on the board.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The work item does not exist on the board.
    #[error("work item not found: {0}")]
    WorkItemNotFound(WorkItemId),

    /// Another column on the board already uses the name.
    #[error("a column named '{0}' already exists on this board")]
    DuplicateColumnName(String),

    /// The board has no column to place a work item in.
    #[error("board {0} has no columns")]
    NoColumnAvailable(BoardId),

    /// Items cannot be reassigned to the column being deleted.
    #[error("column {0} cannot receive its own items")]
    InvalidFallbackColumn(ColumnId),
}

/// Coarse classification used by transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardErrorKind {
    /// Malformed input; rejected before any write.
    Validation,
    /// Uniqueness violation or lost race; safe to retry.
    Conflict,
    /// Referenced resource absent.
    NotFound,
    /// Infrastructure failure; the transaction rolled back.
    Transaction,
}

impl BoardErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Conflict => 409,
            Self::NotFound => 404,
            Self::Transaction => 500,
        }
    }

    /// Returns `true` when repeating the whole operation may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Conflict | Self::Transaction)
    }
}

impl BoardServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::Domain(_) | Self::NoColumnAvailable(_) | Self::InvalidFallbackColumn(_) => {
                BoardErrorKind::Validation
            }
            Self::DuplicateColumnName(_) => BoardErrorKind::Conflict,
            Self::NoBoardForProject(_)
            | Self::BoardNotFound(_)
            | Self::ColumnNotFound(_)
            | Self::WorkItemNotFound(_) => BoardErrorKind::NotFound,
            Self::OrderKey(err) => order_key_kind(err),
            Self::Repository(err) => repository_kind(err),
        }
    }

    /// Returns `true` when repeating the whole operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

const fn repository_kind(err: &BoardRepositoryError) -> BoardErrorKind {
    match err {
        BoardRepositoryError::DuplicateBoard(_)
        | BoardRepositoryError::DuplicateColumnName(_)
        | BoardRepositoryError::OrderKeyConflict(_)
        | BoardRepositoryError::ColumnNotEmpty { .. }
        | BoardRepositoryError::StaleOrdering(_) => BoardErrorKind::Conflict,
        BoardRepositoryError::BoardNotFound(_)
        | BoardRepositoryError::ColumnNotFound(_)
        | BoardRepositoryError::WorkItemNotFound(_) => BoardErrorKind::NotFound,
        BoardRepositoryError::OrderKey(key_err) => order_key_kind(key_err),
        BoardRepositoryError::Persistence(_) => BoardErrorKind::Transaction,
    }
}

const fn order_key_kind(err: &OrderKeyError) -> BoardErrorKind {
    match err {
        OrderKeyError::NotPositive(_) | OrderKeyError::Overflow => BoardErrorKind::Validation,
        OrderKeyError::Unordered
        | OrderKeyError::DuplicateInTargetOrder
        | OrderKeyError::MissingFromTargetOrder => BoardErrorKind::Transaction,
    }
}
