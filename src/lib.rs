//! Pentaboard: board column and work item ordering engine.
//!
//! This crate maintains the order of a project board's columns and of the
//! work items inside each column, using gap-tolerant integer keys and a
//! two-phase renumbering transaction that never violates the per-board
//! unique key index.
//!
//! # Architecture
//!
//! Pentaboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure ordering logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`board`]: Boards, column ordering and work item placement
//! - [`access`]: Acting-user context and roles
//! - [`config`]: Service configuration and connection pool construction
//! - [`telemetry`]: Tracing subscriber installation

pub mod access;
pub mod board;
pub mod config;
pub mod telemetry;
