//! Activity summary of a board over a trailing window of days.

use super::{Board, ColumnId, ColumnSequence, WorkItem, WorkItemId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Window used when the caller asks for zero or negative days.
pub const DEFAULT_SUMMARY_DAYS: i64 = 7;

/// Number of recent items listed in a summary.
const RECENT_LIMIT: usize = 10;

/// Completion status reported for a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// The item sits in a done column.
    Completed,
    /// The item sits in any other column.
    InProgress,
}

/// Recently created work item listed in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentItem {
    /// Work item identifier.
    pub id: WorkItemId,
    /// Work item title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion status.
    pub status: ItemStatus,
}

/// Counts of created, completed and in-progress work on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Items created within the window.
    pub created: usize,
    /// Items currently in a done column.
    pub completed: usize,
    /// Items currently in any other column.
    pub in_progress: usize,
    /// Most recently created items within the window, newest first.
    pub recent: Vec<RecentItem>,
}

impl BoardSummary {
    /// Summarizes `items` on `board` for the `days` preceding `now`.
    #[must_use]
    pub fn compute(
        board: &Board,
        columns: &ColumnSequence,
        items: &[WorkItem],
        days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let window = if days <= 0 { DEFAULT_SUMMARY_DAYS } else { days };
        let since = Duration::try_days(window)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let done = done_columns(board, columns);
        let status_of = |item: &WorkItem| {
            if done.contains(&item.column_id()) {
                ItemStatus::Completed
            } else {
                ItemStatus::InProgress
            }
        };

        let completed = items
            .iter()
            .filter(|item| status_of(*item) == ItemStatus::Completed)
            .count();

        let mut recent_items: Vec<&WorkItem> = items
            .iter()
            .filter(|item| item.created_at() >= since)
            .collect();
        let created = recent_items.len();
        recent_items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let recent = recent_items
            .into_iter()
            .take(RECENT_LIMIT)
            .map(|item| RecentItem {
                id: item.id(),
                title: item.title().as_str().to_owned(),
                created_at: item.created_at(),
                status: status_of(item),
            })
            .collect();

        Self {
            created,
            completed,
            in_progress: items.len() - completed,
            recent,
        }
    }
}

/// Resolves the columns that count as done: the board's pointer, else
/// columns flagged done-like, else the rightmost column.
#[must_use]
pub fn done_columns(board: &Board, columns: &ColumnSequence) -> Vec<ColumnId> {
    if let Some(id) = board.done_column_id() {
        return vec![id];
    }
    let flagged: Vec<ColumnId> = columns
        .as_slice()
        .iter()
        .filter(|column| column.is_done_like())
        .map(|column| column.id())
        .collect();
    if !flagged.is_empty() {
        return flagged;
    }
    columns.last().map(|column| column.id()).into_iter().collect()
}
