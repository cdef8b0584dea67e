//! Kanban boards: ordered columns and work item placement.
//!
//! Columns and work items are positioned by integer order keys spaced ten
//! apart. New columns take the midpoint of a free gap when one exists; when
//! it does not, and whenever columns are moved or deleted, the board is
//! renumbered in two phases (temporary keys above the current maximum, then
//! `10, 20, 30, …`) inside one transaction so the unique `(board, key)` index
//! holds at every write. Work items always append to the end of a column.
//!
//! - Domain types and the pure allocator in [`domain`]
//! - Port contracts in [`ports`]
//! - In-memory and `PostgreSQL` adapters in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
