//! Board column (workflow state) aggregate and its validated attributes.

use super::{BoardDomainError, BoardId, ColumnId, OrderKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a column name, matching the `VARCHAR(100)` column.
const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for a column colour, matching the `VARCHAR(50)` column.
const MAX_COLOR_LENGTH: usize = 50;

/// Trimmed, non-empty column name. Unique per board, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    /// Creates a validated column name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] when the value is empty
    /// after trimming, or [`BoardDomainError::ColumnNameTooLong`] when it
    /// exceeds 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyColumnName);
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(BoardDomainError::ColumnNameTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares two names the way the board uniqueness rule does.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl AsRef<str> for ColumnName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes an optional colour: blank values become `None`.
///
/// # Errors
///
/// Returns [`BoardDomainError::ColorTooLong`] when the colour exceeds 50
/// characters.
pub fn normalize_color(color: Option<String>) -> Result<Option<String>, BoardDomainError> {
    let Some(raw) = color else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_COLOR_LENGTH {
        return Err(BoardDomainError::ColorTooLong(raw));
    }
    Ok(Some(trimmed.to_owned()))
}

/// Positive work-in-progress limit for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WipLimit(u32);

impl WipLimit {
    /// Creates a validated WIP limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidWipLimit`] for zero, negative, or
    /// values beyond the `INT` column range.
    pub fn new(value: i64) -> Result<Self, BoardDomainError> {
        if value <= 0 || value > i64::from(i32::MAX) {
            return Err(BoardDomainError::InvalidWipLimit(value));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| BoardDomainError::InvalidWipLimit(value))
    }

    /// Returns the limit.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Column on a board, ordered by [`OrderKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    id: ColumnId,
    board_id: BoardId,
    name: ColumnName,
    order_key: OrderKey,
    color: Option<String>,
    wip_limit: Option<WipLimit>,
    is_default: bool,
    is_done_like: bool,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Owning board.
    pub board_id: BoardId,
    /// Persisted name.
    pub name: ColumnName,
    /// Persisted position.
    pub order_key: OrderKey,
    /// Persisted colour.
    pub color: Option<String>,
    /// Persisted WIP limit.
    pub wip_limit: Option<WipLimit>,
    /// Whether new work items land here by default.
    pub is_default: bool,
    /// Whether the column represents completed work.
    pub is_done_like: bool,
}

impl BoardColumn {
    /// Creates a new, non-default column.
    #[must_use]
    pub fn new(board_id: BoardId, name: ColumnName, order_key: OrderKey) -> Self {
        Self {
            id: ColumnId::new(),
            board_id,
            name,
            order_key,
            color: None,
            wip_limit: None,
            is_default: false,
            is_done_like: false,
        }
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            name: data.name,
            order_key: data.order_key,
            color: data.color,
            wip_limit: data.wip_limit,
            is_default: data.is_default,
            is_done_like: data.is_done_like,
        }
    }

    /// Sets the display colour.
    #[must_use]
    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// Sets the WIP limit.
    #[must_use]
    pub const fn with_wip_limit(mut self, wip_limit: Option<WipLimit>) -> Self {
        self.wip_limit = wip_limit;
        self
    }

    /// Marks the column as the default target for new work items.
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Sets whether the column represents completed work.
    #[must_use]
    pub const fn with_done_like(mut self, is_done_like: bool) -> Self {
        self.is_done_like = is_done_like;
        self
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the column name.
    #[must_use]
    pub const fn name(&self) -> &ColumnName {
        &self.name
    }

    /// Returns the position key.
    #[must_use]
    pub const fn order_key(&self) -> OrderKey {
        self.order_key
    }

    /// Returns the display colour, if any.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Returns the WIP limit, if any.
    #[must_use]
    pub const fn wip_limit(&self) -> Option<WipLimit> {
        self.wip_limit
    }

    /// Returns whether new work items land here by default.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// Returns whether the column represents completed work.
    #[must_use]
    pub const fn is_done_like(&self) -> bool {
        self.is_done_like
    }

    /// Replaces the column name. The position is unaffected.
    pub fn rename(&mut self, name: ColumnName) {
        self.name = name;
    }

    /// Moves the column to `order_key`.
    pub const fn reposition(&mut self, order_key: OrderKey) {
        self.order_key = order_key;
    }
}
