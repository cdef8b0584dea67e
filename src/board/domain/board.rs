//! Board aggregate root and default column seeding.

use super::{
    BoardColumn, BoardDomainError, BoardId, ColumnId, ColumnName, OrderKeyError, ProjectId, UserId,
    order_key::append_run,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Name given to lazily created boards.
pub const DEFAULT_BOARD_NAME: &str = "Default";

/// Kanban board owned by a single project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    project_id: ProjectId,
    name: String,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    default_column_id: Option<ColumnId>,
    done_column_id: Option<ColumnId>,
    settings: Option<serde_json::Value>,
}

/// Parameter object for reconstructing a persisted board.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedBoardData {
    /// Persisted board identifier.
    pub id: BoardId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Board name.
    pub name: String,
    /// User that caused the board to be created.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, if the board was ever updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Column new work items land in when none is specified.
    pub default_column_id: Option<ColumnId>,
    /// Column representing completed work for reporting.
    pub done_column_id: Option<ColumnId>,
    /// Free-form UI settings.
    pub settings: Option<serde_json::Value>,
}

impl Board {
    /// Creates a new board named [`DEFAULT_BOARD_NAME`] for `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, created_by: UserId, clock: &impl Clock) -> Self {
        Self {
            id: BoardId::new(),
            project_id,
            name: DEFAULT_BOARD_NAME.to_owned(),
            created_by,
            created_at: clock.utc(),
            updated_at: None,
            default_column_id: None,
            done_column_id: None,
            settings: None,
        }
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
            default_column_id: data.default_column_id,
            done_column_id: data.done_column_id,
            settings: data.settings,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the default column pointer.
    #[must_use]
    pub const fn default_column_id(&self) -> Option<ColumnId> {
        self.default_column_id
    }

    /// Returns the done column pointer.
    #[must_use]
    pub const fn done_column_id(&self) -> Option<ColumnId> {
        self.done_column_id
    }

    /// Returns the UI settings blob.
    #[must_use]
    pub const fn settings(&self) -> Option<&serde_json::Value> {
        self.settings.as_ref()
    }

    /// Builds the three columns every new board starts with and points the
    /// default/done shortcuts at them.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] if a seed name or key fails validation.
    pub fn seed_columns(
        &mut self,
        clock: &impl Clock,
    ) -> Result<Vec<BoardColumn>, BoardDomainError> {
        let keys = append_run(None, 3)?;
        let [todo_key, doing_key, done_key] = keys.as_slice() else {
            return Err(BoardDomainError::OrderKey(OrderKeyError::Overflow));
        };
        let todo = BoardColumn::new(self.id, ColumnName::new("To Do")?, *todo_key).as_default();
        let doing = BoardColumn::new(self.id, ColumnName::new("Doing")?, *doing_key);
        let done =
            BoardColumn::new(self.id, ColumnName::new("Done")?, *done_key).with_done_like(true);

        self.default_column_id = Some(todo.id());
        self.done_column_id = Some(done.id());
        self.touch(clock);
        Ok(vec![todo, doing, done])
    }

    /// Clears default/done pointers that reference `column_id`.
    ///
    /// Returns `true` when a pointer changed.
    pub fn forget_column(&mut self, column_id: ColumnId, clock: &impl Clock) -> bool {
        let mut changed = false;
        if self.default_column_id == Some(column_id) {
            self.default_column_id = None;
            changed = true;
        }
        if self.done_column_id == Some(column_id) {
            self.done_column_id = None;
            changed = true;
        }
        if changed {
            self.touch(clock);
        }
        changed
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = Some(clock.utc());
    }
}
