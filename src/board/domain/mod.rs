//! Domain model for boards, ordered columns and work item placement.
//!
//! Everything here is pure: the order-key allocator, the two-phase renumber
//! plan and the ordered column sequence perform no I/O and can be exercised
//! without a store.

mod board;
mod column;
mod error;
mod ids;
pub mod order_key;
mod renumber;
mod sequence;
mod summary;
mod work_item;

pub use board::{Board, DEFAULT_BOARD_NAME, PersistedBoardData};
pub use column::{BoardColumn, ColumnName, PersistedColumnData, WipLimit, normalize_color};
pub use error::{BoardDomainError, OrderKeyError};
pub use ids::{BoardId, ColumnId, ProjectId, UserId, WorkItemId};
pub use order_key::{InsertSlot, ORDER_KEY_STEP, OrderKey, TEMPORARY_KEY_OFFSET};
pub use renumber::{KeyAssignment, RenumberPlan};
pub use sequence::{ColumnPlacement, ColumnSequence};
pub use summary::{BoardSummary, DEFAULT_SUMMARY_DAYS, ItemStatus, RecentItem, done_columns};
pub use work_item::{
    DEFAULT_WORK_ITEM_TYPE, Level, NewWorkItem, PersistedWorkItemData, WorkItem, WorkItemTitle,
    WorkItemType,
};
