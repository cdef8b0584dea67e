//! Shared world state for board column ordering BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use pentaboard::access::{ActingUser, Role};
use pentaboard::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{BoardColumn, ProjectId, UserId, WorkItem},
    services::{BoardService, BoardServiceError, ColumnOrderingService, WorkItemPlacementService},
};
use rstest::fixture;

/// Board lookup service used by the BDD world.
pub type TestBoardService = BoardService<InMemoryBoardStore, InMemoryBoardStore, DefaultClock>;
/// Column ordering service used by the BDD world.
pub type TestColumnService = ColumnOrderingService<InMemoryBoardStore, DefaultClock>;
/// Work item placement service used by the BDD world.
pub type TestPlacementService =
    WorkItemPlacementService<InMemoryBoardStore, InMemoryBoardStore, DefaultClock>;

/// Scenario world for column ordering behaviour tests.
pub struct ColumnOrderingWorld {
    pub boards: TestBoardService,
    pub columns: TestColumnService,
    pub placement: TestPlacementService,
    pub actor: ActingUser,
    pub project_id: ProjectId,
    pub work_items: HashMap<String, WorkItem>,
    pub last_error: Option<BoardServiceError>,
}

impl ColumnOrderingWorld {
    /// Creates a world for a fresh project with no board yet.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBoardStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            boards: BoardService::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&clock)),
            columns: ColumnOrderingService::new(Arc::clone(&store), Arc::clone(&clock)),
            placement: WorkItemPlacementService::new(Arc::clone(&store), store, clock),
            actor: ActingUser::new(UserId::new(), Role::User),
            project_id: ProjectId::new(),
            work_items: HashMap::new(),
            last_error: None,
        }
    }

    /// Returns the project's columns, seeding the board on first use.
    ///
    /// # Errors
    ///
    /// Returns an error when the board lookup fails.
    pub fn current_columns(&self) -> Result<Vec<BoardColumn>, eyre::Report> {
        let view = run_async(self.boards.get_board(&self.actor, self.project_id))
            .map_err(|err| eyre::eyre!("board lookup failed: {err}"))?;
        Ok(view.columns)
    }

    /// Finds a column by its display name.
    ///
    /// # Errors
    ///
    /// Returns an error when the board has no such column.
    pub fn column_named(&self, name: &str) -> Result<BoardColumn, eyre::Report> {
        self.current_columns()?
            .into_iter()
            .find(|column| column.name().as_str() == name)
            .ok_or_else(|| eyre::eyre!("no column named {name} on the board"))
    }
}

impl Default for ColumnOrderingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ColumnOrderingWorld {
    ColumnOrderingWorld::default()
}

/// Parses a layout such as `To Do:10, Done:20` into name and key pairs.
///
/// # Errors
///
/// Returns an error when an entry lacks a numeric key.
pub fn parse_layout(layout: &str) -> Result<Vec<(String, i32)>, eyre::Report> {
    layout
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, raw_key) = entry
                .rsplit_once(':')
                .ok_or_else(|| eyre::eyre!("layout entry {entry} has no key"))?;
            let key = raw_key
                .trim()
                .parse::<i32>()
                .map_err(|err| eyre::eyre!("layout entry {entry} has a bad key: {err}"))?;
            Ok((name.trim().to_owned(), key))
        })
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
