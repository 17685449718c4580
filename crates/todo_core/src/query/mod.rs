//! Read-side queries over a task snapshot.
//!
//! # Responsibility
//! - Provide expiry, filter/search and statistics functions.
//!
//! # Invariants
//! - Query functions never mutate the store.
//! - "Today" is always passed in; queries do not read the clock.

pub mod filter;
pub mod stats;
