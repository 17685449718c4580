//! Domain model for tracked tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by store and query logic.
//!
//! # Invariants
//! - Every task is identified by a store-allocated `TaskId`.
//! - Optional dates are `Option<TaskDate>`, never sentinel values.

pub mod date;
pub mod task;
