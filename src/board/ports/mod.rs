//! Port contracts for board persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod repository;

pub use repository::{
    BoardRepository, BoardRepositoryError, BoardRepositoryResult, ColumnRemoval, ItemDisposition,
    WorkItemRepository,
};

#[cfg(test)]
pub use repository::{MockBoardRepository, MockWorkItemRepository};
