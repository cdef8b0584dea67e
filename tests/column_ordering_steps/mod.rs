//! Step definitions for board column ordering scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
