//! Adapter implementations of the board ports.

pub mod memory;
pub mod postgres;
