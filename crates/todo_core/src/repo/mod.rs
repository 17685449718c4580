//! Persistence layer for the task collection.
//!
//! # Responsibility
//! - Define the storage contract used by the store.
//! - Keep the flat-file line format inside the persistence boundary.
//!
//! # Invariants
//! - Storage reads and writes the whole collection; there are no partial writes.

pub mod task_file;
