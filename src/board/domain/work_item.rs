//! Work item aggregate placed in a board column.

use super::{BoardDomainError, BoardId, ColumnId, OrderKey, ProjectId, UserId, WorkItemId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length, matching the `VARCHAR(200)` column.
const MAX_TITLE_LENGTH: usize = 200;

/// Maximum type length, matching the `VARCHAR(50)` column.
const MAX_TYPE_LENGTH: usize = 50;

/// Type assigned when the caller leaves it blank.
pub const DEFAULT_WORK_ITEM_TYPE: &str = "Task";

/// Trimmed, non-empty work item title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemTitle(String);

impl WorkItemTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyWorkItemTitle`] when blank, or
    /// [`BoardDomainError::WorkItemTitleTooLong`] beyond 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyWorkItemTitle);
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(BoardDomainError::WorkItemTitleTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItemTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form classification such as `Task`, `Bug` or `Story`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemType(String);

impl WorkItemType {
    /// Creates a type, falling back to [`DEFAULT_WORK_ITEM_TYPE`] when blank.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::WorkItemTypeTooLong`] beyond 50
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed.chars().count() > MAX_TYPE_LENGTH {
            return Err(BoardDomainError::WorkItemTypeTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the type as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WorkItemType {
    fn default() -> Self {
        Self(DEFAULT_WORK_ITEM_TYPE.to_owned())
    }
}

/// Priority or severity on a 1 (highest) to 5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    /// Creates a validated level for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidLevel`] outside `1..=5`.
    pub const fn new(field: &'static str, value: u8) -> Result<Self, BoardDomainError> {
        if value == 0 || value > 5 {
            return Err(BoardDomainError::InvalidLevel { field, value });
        }
        Ok(Self(value))
    }

    /// Returns the numeric level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Unit of work positioned within a board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    id: WorkItemId,
    project_id: ProjectId,
    board_id: BoardId,
    column_id: ColumnId,
    title: WorkItemTitle,
    description: Option<String>,
    item_type: WorkItemType,
    priority: Option<Level>,
    severity: Option<Level>,
    reporter_id: UserId,
    assignee_id: Option<UserId>,
    order_key: OrderKey,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Placement and content fields for a new work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkItem {
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning board.
    pub board_id: BoardId,
    /// Resolved target column.
    pub column_id: ColumnId,
    /// Validated title.
    pub title: WorkItemTitle,
    /// Description; blank values are dropped.
    pub description: Option<String>,
    /// Classification.
    pub item_type: WorkItemType,
    /// Optional priority.
    pub priority: Option<Level>,
    /// Optional severity.
    pub severity: Option<Level>,
    /// Acting user that reported the item.
    pub reporter_id: UserId,
    /// Optional assignee.
    pub assignee_id: Option<UserId>,
    /// Appended position within the column.
    pub order_key: OrderKey,
}

/// Parameter object for reconstructing a persisted work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkItemData {
    /// Persisted identifier.
    pub id: WorkItemId,
    /// Persisted placement and content.
    pub fields: NewWorkItem,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl WorkItem {
    /// Creates a work item from validated fields.
    #[must_use]
    pub fn new(fields: NewWorkItem, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self::assemble(WorkItemId::new(), fields, timestamp, timestamp)
    }

    /// Reconstructs a work item from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkItemData) -> Self {
        Self::assemble(data.id, data.fields, data.created_at, data.updated_at)
    }

    fn assemble(
        id: WorkItemId,
        fields: NewWorkItem,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let description = fields
            .description
            .filter(|text| !text.trim().is_empty());
        Self {
            id,
            project_id: fields.project_id,
            board_id: fields.board_id,
            column_id: fields.column_id,
            title: fields.title,
            description,
            item_type: fields.item_type,
            priority: fields.priority,
            severity: fields.severity,
            reporter_id: fields.reporter_id,
            assignee_id: fields.assignee_id,
            order_key: fields.order_key,
            created_at,
            updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> WorkItemId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the column the item sits in.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &WorkItemTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the classification.
    #[must_use]
    pub const fn item_type(&self) -> &WorkItemType {
        &self.item_type
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Option<Level> {
        self.priority
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Option<Level> {
        self.severity
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the position within the column.
    #[must_use]
    pub const fn order_key(&self) -> OrderKey {
        self.order_key
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Places the item at `order_key` in `column_id` and stamps the change.
    pub fn place(&mut self, column_id: ColumnId, order_key: OrderKey, clock: &impl Clock) {
        self.relocate(column_id, order_key, clock.utc());
    }

    /// Places the item at `order_key` in `column_id` as of `at`.
    ///
    /// Used by stores that reassign items while removing a column.
    pub const fn relocate(&mut self, column_id: ColumnId, order_key: OrderKey, at: DateTime<Utc>) {
        self.column_id = column_id;
        self.order_key = order_key;
        self.updated_at = at;
    }
}
