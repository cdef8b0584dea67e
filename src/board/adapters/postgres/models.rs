//! Diesel row models for board persistence and their domain conversions.

use super::schema::{board_columns, boards, work_items};
use crate::board::{
    domain::{
        Board, BoardColumn, BoardId, ColumnId, ColumnName, Level, NewWorkItem, OrderKey,
        PersistedBoardData, PersistedColumnData, PersistedWorkItemData, ProjectId, UserId,
        WipLimit, WorkItem, WorkItemId, WorkItemTitle, WorkItemType,
    },
    ports::{BoardRepositoryError, BoardRepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

/// Board row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Board identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Board name.
    pub name: String,
    /// Creating user.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Default column pointer.
    pub default_column_id: Option<Uuid>,
    /// Done column pointer.
    pub done_column_id: Option<Uuid>,
    /// UI settings.
    pub settings: Option<Value>,
}

/// Board column row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: Uuid,
    /// Owning board.
    pub board_id: Uuid,
    /// Column name.
    pub name: String,
    /// Position.
    pub order_key: i32,
    /// Display colour.
    pub color: Option<String>,
    /// WIP limit.
    pub wip_limit: Option<i32>,
    /// Default flag.
    pub is_default: bool,
    /// Done-like flag.
    pub is_done_like: bool,
}

/// Work item row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = work_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkItemRow {
    /// Work item identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Owning board.
    pub board_id: Uuid,
    /// Column.
    pub column_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Classification.
    pub item_type: String,
    /// Priority.
    pub priority: Option<i16>,
    /// Severity.
    pub severity: Option<i16>,
    /// Reporter.
    pub reporter_id: Uuid,
    /// Assignee.
    pub assignee_id: Option<Uuid>,
    /// Position within the column.
    pub order_key: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Board> for BoardRow {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id().into_inner(),
            project_id: board.project_id().into_inner(),
            name: board.name().to_owned(),
            created_by: board.created_by().into_inner(),
            created_at: board.created_at(),
            updated_at: board.updated_at(),
            default_column_id: board.default_column_id().map(ColumnId::into_inner),
            done_column_id: board.done_column_id().map(ColumnId::into_inner),
            settings: board.settings().cloned(),
        }
    }
}

impl From<BoardRow> for Board {
    fn from(row: BoardRow) -> Self {
        Self::from_persisted(PersistedBoardData {
            id: BoardId::from_uuid(row.id),
            project_id: ProjectId::from_uuid(row.project_id),
            name: row.name,
            created_by: UserId::from_uuid(row.created_by),
            created_at: row.created_at,
            updated_at: row.updated_at,
            default_column_id: row.default_column_id.map(ColumnId::from_uuid),
            done_column_id: row.done_column_id.map(ColumnId::from_uuid),
            settings: row.settings,
        })
    }
}

impl From<&BoardColumn> for ColumnRow {
    fn from(column: &BoardColumn) -> Self {
        Self {
            id: column.id().into_inner(),
            board_id: column.board_id().into_inner(),
            name: column.name().as_str().to_owned(),
            order_key: column.order_key().value(),
            color: column.color().map(str::to_owned),
            wip_limit: column
                .wip_limit()
                .and_then(|limit| i32::try_from(limit.value()).ok()),
            is_default: column.is_default(),
            is_done_like: column.is_done_like(),
        }
    }
}

impl TryFrom<ColumnRow> for BoardColumn {
    type Error = BoardRepositoryError;

    fn try_from(row: ColumnRow) -> BoardRepositoryResult<Self> {
        let name = ColumnName::new(row.name).map_err(BoardRepositoryError::persistence)?;
        let wip_limit = row
            .wip_limit
            .map(|limit| WipLimit::new(i64::from(limit)))
            .transpose()
            .map_err(BoardRepositoryError::persistence)?;
        Ok(Self::from_persisted(PersistedColumnData {
            id: ColumnId::from_uuid(row.id),
            board_id: BoardId::from_uuid(row.board_id),
            name,
            order_key: OrderKey::new(row.order_key)?,
            color: row.color,
            wip_limit,
            is_default: row.is_default,
            is_done_like: row.is_done_like,
        }))
    }
}

impl From<&WorkItem> for WorkItemRow {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id().into_inner(),
            project_id: item.project_id().into_inner(),
            board_id: item.board_id().into_inner(),
            column_id: item.column_id().into_inner(),
            title: item.title().as_str().to_owned(),
            description: item.description().map(str::to_owned),
            item_type: item.item_type().as_str().to_owned(),
            priority: item.priority().map(|level| i16::from(level.value())),
            severity: item.severity().map(|level| i16::from(level.value())),
            reporter_id: item.reporter_id().into_inner(),
            assignee_id: item.assignee_id().map(UserId::into_inner),
            order_key: item.order_key().value(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

impl TryFrom<WorkItemRow> for WorkItem {
    type Error = BoardRepositoryError;

    fn try_from(row: WorkItemRow) -> BoardRepositoryResult<Self> {
        let fields = NewWorkItem {
            project_id: ProjectId::from_uuid(row.project_id),
            board_id: BoardId::from_uuid(row.board_id),
            column_id: ColumnId::from_uuid(row.column_id),
            title: WorkItemTitle::new(row.title).map_err(BoardRepositoryError::persistence)?,
            description: row.description,
            item_type: WorkItemType::new(row.item_type).map_err(BoardRepositoryError::persistence)?,
            priority: stored_level("priority", row.priority)?,
            severity: stored_level("severity", row.severity)?,
            reporter_id: UserId::from_uuid(row.reporter_id),
            assignee_id: row.assignee_id.map(UserId::from_uuid),
            order_key: OrderKey::new(row.order_key)?,
        };
        Ok(Self::from_persisted(PersistedWorkItemData {
            id: WorkItemId::from_uuid(row.id),
            fields,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

fn stored_level(field: &'static str, value: Option<i16>) -> BoardRepositoryResult<Option<Level>> {
    value
        .map(|raw| {
            let narrowed = u8::try_from(raw).map_err(BoardRepositoryError::persistence)?;
            Level::new(field, narrowed).map_err(BoardRepositoryError::persistence)
        })
        .transpose()
}
