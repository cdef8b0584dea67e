//! Ordered view of a board's columns.
//!
//! Services manipulate positions (indices) here and only translate to integer
//! keys through the allocator, so gap arithmetic lives in one place.

use super::{
    BoardColumn, ColumnId, ColumnName, OrderKey, OrderKeyError,
    order_key::{InsertSlot, insert_slot},
};

/// Columns of one board sorted ascending by [`OrderKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSequence {
    columns: Vec<BoardColumn>,
}

/// Outcome of planning an insertion into a [`ColumnSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPlacement {
    /// Store the new column directly with this key.
    Direct(OrderKey),
    /// Renumber the board into this order, which includes the new column.
    Renumber(Vec<ColumnId>),
}

impl ColumnSequence {
    /// Sorts `columns` by key.
    #[must_use]
    pub fn new(mut columns: Vec<BoardColumn>) -> Self {
        columns.sort_by_key(BoardColumn::order_key);
        Self { columns }
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when the board has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the columns in order.
    #[must_use]
    pub fn as_slice(&self) -> &[BoardColumn] {
        &self.columns
    }

    /// Consumes the sequence, returning the ordered columns.
    #[must_use]
    pub fn into_vec(self) -> Vec<BoardColumn> {
        self.columns
    }

    /// Returns the ordered column identifiers.
    #[must_use]
    pub fn ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(BoardColumn::id).collect()
    }

    /// Returns the ordered keys.
    #[must_use]
    pub fn keys(&self) -> Vec<OrderKey> {
        self.columns.iter().map(BoardColumn::order_key).collect()
    }

    /// Returns `(id, key)` pairs in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(ColumnId, OrderKey)> {
        self.columns
            .iter()
            .map(|column| (column.id(), column.order_key()))
            .collect()
    }

    /// Finds a column by identifier.
    #[must_use]
    pub fn find(&self, id: ColumnId) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.id() == id)
    }

    /// Returns the first column by key.
    #[must_use]
    pub fn first(&self) -> Option<&BoardColumn> {
        self.columns.first()
    }

    /// Returns the last column by key.
    #[must_use]
    pub fn last(&self) -> Option<&BoardColumn> {
        self.columns.last()
    }

    /// Returns a column other than `except` whose name matches ignoring case.
    #[must_use]
    pub fn name_clash(&self, name: &ColumnName, except: Option<ColumnId>) -> Option<&BoardColumn> {
        self.columns
            .iter()
            .filter(|column| Some(column.id()) != except)
            .find(|column| column.name().eq_ignore_case(name))
    }

    /// Plans inserting `new_id` after the column `after`.
    ///
    /// An absent or unknown anchor appends at the end.
    ///
    /// # Errors
    ///
    /// Returns [`OrderKeyError`] when stored keys are corrupt or overflow.
    pub fn plan_insert(
        &self,
        new_id: ColumnId,
        after: Option<ColumnId>,
    ) -> Result<ColumnPlacement, OrderKeyError> {
        let anchor_key = after.and_then(|id| self.find(id)).map(BoardColumn::order_key);
        match insert_slot(&self.keys(), anchor_key)? {
            InsertSlot::Gap(key) | InsertSlot::Append(key) => Ok(ColumnPlacement::Direct(key)),
            InsertSlot::Renormalize { index } => {
                let mut order = self.ids();
                order.insert(index.min(order.len()), new_id);
                Ok(ColumnPlacement::Renumber(order))
            }
        }
    }

    /// Returns the order after moving `id` to `target_index`.
    ///
    /// The index is clamped to `[0, len - 1]` once the column is removed, so
    /// negative values mean first and oversized values mean last. Returns
    /// `None` when `id` is not on the board.
    #[must_use]
    pub fn order_after_move(&self, id: ColumnId, target_index: i64) -> Option<Vec<ColumnId>> {
        let mut order = self.ids();
        let current = order.iter().position(|candidate| *candidate == id)?;
        let moving = order.remove(current);
        let target = usize::try_from(target_index.max(0))
            .unwrap_or(usize::MAX)
            .min(order.len());
        order.insert(target, moving);
        Some(order)
    }

    /// Returns `true` when `desired` lists exactly these columns plus
    /// `inserted`, each once.
    #[must_use]
    pub fn matches_order(&self, desired: &[ColumnId], inserted: Option<ColumnId>) -> bool {
        let expected = self.len() + usize::from(inserted.is_some());
        let mut seen = Vec::with_capacity(desired.len());
        desired.len() == expected
            && desired.iter().all(|id| {
                let known = self.find(*id).is_some() || inserted == Some(*id);
                let fresh = !seen.contains(id);
                seen.push(*id);
                known && fresh
            })
    }

    /// Returns the order with `id` removed.
    #[must_use]
    pub fn order_without(&self, id: ColumnId) -> Vec<ColumnId> {
        self.columns
            .iter()
            .map(BoardColumn::id)
            .filter(|candidate| *candidate != id)
            .collect()
    }
}
