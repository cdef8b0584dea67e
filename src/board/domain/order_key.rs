//! Integer order keys and the pure allocator that places new entries.
//!
//! Keys are spaced [`ORDER_KEY_STEP`] apart so that an entry can usually be
//! inserted between two neighbours without touching them. When two neighbours
//! are adjacent integers the caller must renormalize the whole collection (see
//! [`super::RenumberPlan`]).

use super::OrderKeyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance between consecutive keys after seeding or normalization.
pub const ORDER_KEY_STEP: i32 = 10;

/// Offset added to the current maximum key to form temporary renumber keys.
pub const TEMPORARY_KEY_OFFSET: i32 = 100_000;

/// Position of an entry within an ordered collection; sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct OrderKey(i32);

impl OrderKey {
    /// The key given to the first entry of a collection.
    pub const FIRST: Self = Self(ORDER_KEY_STEP);

    /// Creates a validated order key.
    ///
    /// # Errors
    ///
    /// Returns [`OrderKeyError::NotPositive`] for zero or negative values.
    pub const fn new(value: i32) -> Result<Self, OrderKeyError> {
        if value <= 0 {
            return Err(OrderKeyError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns the key `offset` positions above this one.
    ///
    /// # Errors
    ///
    /// Returns [`OrderKeyError::Overflow`] when the sum leaves the `i32` range.
    pub fn offset_by(self, offset: i32) -> Result<Self, OrderKeyError> {
        let value = self.0.checked_add(offset).ok_or(OrderKeyError::Overflow)?;
        Self::new(value)
    }
}

impl TryFrom<i32> for OrderKey {
    type Error = OrderKeyError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderKey> for i32 {
    fn from(key: OrderKey) -> Self {
        key.0
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a new entry goes when inserted after an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertSlot {
    /// A free key exists strictly between the anchor and its successor.
    Gap(OrderKey),
    /// The anchor was not supplied or not found; append at the end.
    Append(OrderKey),
    /// No free key exists; the collection must be renormalized with the new
    /// entry at `index` of the resulting order.
    Renormalize {
        /// Index of the new entry in the desired final order.
        index: usize,
    },
}

/// Returns the midpoint between `base` and its successor when one is free.
///
/// A missing successor is treated as `base + ORDER_KEY_STEP`, so inserting
/// after the last entry lands half a step behind it.
///
/// # Errors
///
/// Returns [`OrderKeyError::Overflow`] when the virtual successor of `base`
/// leaves the `i32` range.
pub fn gap_between(
    base: OrderKey,
    next: Option<OrderKey>,
) -> Result<Option<OrderKey>, OrderKeyError> {
    let successor = match next {
        Some(key) => key,
        None => base.offset_by(ORDER_KEY_STEP)?,
    };
    let distance = successor.value() - base.value();
    if distance <= 1 {
        return Ok(None);
    }
    base.offset_by(half(distance)).map(Some)
}

#[expect(
    clippy::integer_division,
    reason = "midpoint keys round toward the lower neighbour"
)]
const fn half(distance: i32) -> i32 {
    distance / 2
}

/// Computes a key strictly between `after` and its successor in `ordered`.
///
/// Returns `None` when `after` is not part of the sequence or when the gap to
/// its successor is too narrow.
///
/// # Errors
///
/// Returns [`OrderKeyError::Unordered`] when `ordered` is not strictly
/// increasing, or [`OrderKeyError::Overflow`] on arithmetic overflow.
pub fn gap_insert(
    ordered: &[OrderKey],
    after: OrderKey,
) -> Result<Option<OrderKey>, OrderKeyError> {
    ensure_strictly_increasing(ordered)?;
    let Some(index) = ordered.iter().position(|key| *key == after) else {
        return Ok(None);
    };
    let next = ordered.get(index + 1).copied();
    gap_between(after, next)
}

/// Decides how to insert a new entry after the entry at `after`.
///
/// # Errors
///
/// Returns [`OrderKeyError::Unordered`] when `ordered` is not strictly
/// increasing, or [`OrderKeyError::Overflow`] on arithmetic overflow.
pub fn insert_slot(
    ordered: &[OrderKey],
    after: Option<OrderKey>,
) -> Result<InsertSlot, OrderKeyError> {
    ensure_strictly_increasing(ordered)?;
    let anchor = after.and_then(|key| ordered.iter().position(|candidate| *candidate == key));
    let Some(index) = anchor else {
        return append_key(ordered.iter().copied()).map(InsertSlot::Append);
    };

    let base = ordered
        .get(index)
        .copied()
        .ok_or(OrderKeyError::Unordered)?;
    let next = ordered.get(index + 1).copied();
    Ok(match gap_between(base, next)? {
        Some(key) => InsertSlot::Gap(key),
        None => InsertSlot::Renormalize { index: index + 1 },
    })
}

/// Returns `max + ORDER_KEY_STEP`, or [`OrderKey::FIRST`] for an empty set.
///
/// # Errors
///
/// Returns [`OrderKeyError::Overflow`] when the next key leaves the `i32`
/// range.
pub fn append_key(keys: impl IntoIterator<Item = OrderKey>) -> Result<OrderKey, OrderKeyError> {
    match keys.into_iter().max() {
        Some(max) => max.offset_by(ORDER_KEY_STEP),
        None => Ok(OrderKey::FIRST),
    }
}

/// Returns `count` keys that append after `max`, one step apart.
///
/// # Errors
///
/// Returns [`OrderKeyError::Overflow`] when a key leaves the `i32` range.
pub fn append_run(max: Option<OrderKey>, count: usize) -> Result<Vec<OrderKey>, OrderKeyError> {
    let mut keys = Vec::with_capacity(count);
    let mut last = max;
    for _ in 0..count {
        let key = append_key(last)?;
        keys.push(key);
        last = Some(key);
    }
    Ok(keys)
}

/// Assigns `10, 20, 30, …` to `entries`, which are already in their desired
/// final order.
///
/// # Errors
///
/// Returns [`OrderKeyError::Overflow`] when the collection is too large for
/// evenly spaced 32-bit keys.
pub fn normalized_sequence<Id: Copy>(
    entries: &[Id],
) -> Result<Vec<(Id, OrderKey)>, OrderKeyError> {
    let keys = append_run(None, entries.len())?;
    Ok(entries.iter().copied().zip(keys).collect())
}

fn ensure_strictly_increasing(ordered: &[OrderKey]) -> Result<(), OrderKeyError> {
    if ordered.windows(2).all(|pair| matches!(pair, [a, b] if a < b)) {
        Ok(())
    } else {
        Err(OrderKeyError::Unordered)
    }
}
