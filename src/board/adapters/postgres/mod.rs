//! `PostgreSQL` adapters for board persistence.

pub mod migrations;
mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, PostgresBoardStore};
