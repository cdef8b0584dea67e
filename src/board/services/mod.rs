//! Application services for board column ordering and work item placement.

mod board;
mod columns;
mod error;
mod placement;

pub use board::{BoardService, BoardView};
pub use columns::{
    AddColumnRequest, ColumnOrderingService, DeleteColumnRequest, MoveColumnRequest,
    RenameColumnRequest,
};
pub use error::{BoardErrorKind, BoardServiceError, BoardServiceResult};
pub use placement::{CreateWorkItemRequest, MoveWorkItemRequest, WorkItemPlacementService};
