//! Shared fixtures wiring every board service to one in-memory store.

use std::sync::Arc;

use crate::access::{ActingUser, Role};
use crate::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{BoardColumn, ProjectId, UserId},
    services::{BoardService, BoardView, ColumnOrderingService, WorkItemPlacementService},
};
use mockable::DefaultClock;
use rstest::fixture;

pub(super) type TestBoards = BoardService<InMemoryBoardStore, InMemoryBoardStore, DefaultClock>;
pub(super) type TestColumns = ColumnOrderingService<InMemoryBoardStore, DefaultClock>;
pub(super) type TestPlacement =
    WorkItemPlacementService<InMemoryBoardStore, InMemoryBoardStore, DefaultClock>;

pub(super) struct BoardHarness {
    pub store: Arc<InMemoryBoardStore>,
    pub boards: TestBoards,
    pub columns: TestColumns,
    pub placement: TestPlacement,
    pub actor: ActingUser,
    pub project_id: ProjectId,
}

impl BoardHarness {
    /// Returns the project's board, seeding it on first call.
    pub async fn board(&self) -> BoardView {
        self.boards
            .get_board(&self.actor, self.project_id)
            .await
            .expect("board lookup should succeed")
    }

    pub async fn column(&self, name: &str) -> BoardColumn {
        self.board()
            .await
            .columns
            .into_iter()
            .find(|column| column.name().as_str() == name)
            .unwrap_or_else(|| panic!("column {name} should exist"))
    }

    /// Names and keys of the board's columns in order.
    pub async fn layout(&self) -> Vec<(String, i32)> {
        self.board()
            .await
            .columns
            .iter()
            .map(|column| (column.name().as_str().to_owned(), column.order_key().value()))
            .collect()
    }
}

pub(super) fn layout_of(columns: &[BoardColumn]) -> Vec<(String, i32)> {
    columns
        .iter()
        .map(|column| (column.name().as_str().to_owned(), column.order_key().value()))
        .collect()
}

pub(super) fn expected(pairs: &[(&str, i32)]) -> Vec<(String, i32)> {
    pairs
        .iter()
        .map(|(name, key)| ((*name).to_owned(), *key))
        .collect()
}

#[fixture]
pub(super) fn harness() -> BoardHarness {
    let store = Arc::new(InMemoryBoardStore::new());
    let clock = Arc::new(DefaultClock);
    BoardHarness {
        boards: BoardService::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&clock)),
        columns: ColumnOrderingService::new(Arc::clone(&store), Arc::clone(&clock)),
        placement: WorkItemPlacementService::new(Arc::clone(&store), Arc::clone(&store), clock),
        store,
        actor: ActingUser::new(UserId::new(), Role::Admin),
        project_id: ProjectId::new(),
    }
}
