//! Unit tests for board ordering, placement and reporting.

mod support;
