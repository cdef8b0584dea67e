//! Error types for board domain validation and order-key arithmetic.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The column name is empty after trimming.
    #[error("column name is required")]
    EmptyColumnName,

    /// The column name exceeds the 100-character storage limit.
    #[error("column name exceeds 100 character limit: {0}")]
    ColumnNameTooLong(String),

    /// The column colour exceeds the 50-character storage limit.
    #[error("column color exceeds 50 character limit: {0}")]
    ColorTooLong(String),

    /// The work-in-progress limit is not a positive number.
    #[error("invalid WIP limit {0}, expected a positive integer")]
    InvalidWipLimit(i64),

    /// The work item title is empty after trimming.
    #[error("work item title is required")]
    EmptyWorkItemTitle,

    /// The work item title exceeds the 200-character storage limit.
    #[error("work item title exceeds 200 character limit")]
    WorkItemTitleTooLong,

    /// The work item type exceeds the 50-character storage limit.
    #[error("work item type exceeds 50 character limit: {0}")]
    WorkItemTypeTooLong(String),

    /// A priority or severity level lies outside `1..=5`.
    #[error("invalid {field} level {value}, expected 1 to 5")]
    InvalidLevel {
        /// Name of the rejected field.
        field: &'static str,
        /// Rejected value.
        value: u8,
    },

    /// Order-key arithmetic failed.
    #[error(transparent)]
    OrderKey(#[from] OrderKeyError),
}

/// Errors returned by the order-key allocator and renumber planning.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum OrderKeyError {
    /// Order keys must be strictly positive.
    #[error("order key {0} is not positive")]
    NotPositive(i32),

    /// Key arithmetic left the 32-bit range.
    #[error("order key arithmetic overflowed")]
    Overflow,

    /// The supplied keys were not strictly increasing.
    #[error("order keys are not strictly increasing")]
    Unordered,

    /// The desired order lists the same entry twice.
    #[error("target order contains a duplicate entry")]
    DuplicateInTargetOrder,

    /// An entry of the current collection is absent from the desired order.
    #[error("target order omits an entry of the current collection")]
    MissingFromTargetOrder,
}
