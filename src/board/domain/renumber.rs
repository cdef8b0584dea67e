//! Two-phase renumbering of a collection under a unique `(parent, key)` index.
//!
//! Reordering in place would momentarily give two rows the same key. A
//! [`RenumberPlan`] avoids that by first moving every row to a temporary key
//! above the current maximum and only then writing the final evenly spaced
//! keys. Adapters apply both phases inside one transaction.

use super::{
    OrderKeyError,
    order_key::{OrderKey, TEMPORARY_KEY_OFFSET, normalized_sequence},
};
use std::collections::HashSet;
use std::hash::Hash;

/// One key write within a renumber phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAssignment<Id> {
    /// Entry receiving the key.
    pub id: Id,
    /// Key written for the entry.
    pub key: OrderKey,
}

/// Temporary and final key assignments for reordering a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenumberPlan<Id> {
    temporary: Vec<KeyAssignment<Id>>,
    target: Vec<KeyAssignment<Id>>,
}

impl<Id> RenumberPlan<Id>
where
    Id: Copy + Eq + Hash,
{
    /// Builds a plan moving `current` into `desired` order.
    ///
    /// `current` lists the stored entries with their keys in a stable order.
    /// `desired` is the final order; entries in `desired` that are not in
    /// `current` are new rows, which receive temporary keys after the existing
    /// ones so the caller can insert them during the first phase.
    ///
    /// # Errors
    ///
    /// Returns [`OrderKeyError::DuplicateInTargetOrder`] when `desired` lists
    /// an entry twice, [`OrderKeyError::MissingFromTargetOrder`] when a
    /// current entry is absent from `desired`, or
    /// [`OrderKeyError::Overflow`] when keys leave the `i32` range.
    pub fn build(current: &[(Id, OrderKey)], desired: &[Id]) -> Result<Self, OrderKeyError> {
        let mut seen = HashSet::with_capacity(desired.len());
        if !desired.iter().all(|id| seen.insert(*id)) {
            return Err(OrderKeyError::DuplicateInTargetOrder);
        }

        let existing: HashSet<Id> = current.iter().map(|(id, _)| *id).collect();
        if existing.len() != current.len() {
            return Err(OrderKeyError::DuplicateInTargetOrder);
        }
        if !existing.iter().all(|id| seen.contains(id)) {
            return Err(OrderKeyError::MissingFromTargetOrder);
        }

        let current_max = current
            .iter()
            .map(|(_, key)| key.value())
            .max()
            .unwrap_or(0);
        let base_value = current_max
            .checked_add(TEMPORARY_KEY_OFFSET)
            .ok_or(OrderKeyError::Overflow)?;
        let temporary_base = OrderKey::new(base_value)?;

        let inserted = desired
            .iter()
            .copied()
            .filter(|id| !existing.contains(id));
        let temporary = current
            .iter()
            .map(|(id, _)| *id)
            .chain(inserted)
            .enumerate()
            .map(|(index, id)| {
                let offset = i32::try_from(index).map_err(|_| OrderKeyError::Overflow)?;
                Ok(KeyAssignment {
                    id,
                    key: temporary_base.offset_by(offset)?,
                })
            })
            .collect::<Result<Vec<_>, OrderKeyError>>()?;

        let target = normalized_sequence(desired)?
            .into_iter()
            .map(|(id, key)| KeyAssignment { id, key })
            .collect();

        Ok(Self { temporary, target })
    }

    /// Returns the first-phase assignments: existing entries first, then new
    /// entries in desired order.
    #[must_use]
    pub fn temporary(&self) -> &[KeyAssignment<Id>] {
        &self.temporary
    }

    /// Returns the second-phase assignments in desired order.
    #[must_use]
    pub fn target(&self) -> &[KeyAssignment<Id>] {
        &self.target
    }
}
