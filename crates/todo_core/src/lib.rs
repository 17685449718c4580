//! Core domain logic for the todo task tracker.
//! This crate is the single source of truth for task invariants.

pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::date::{format_date, parse_date, TaskDate, NO_DATE};
pub use model::task::{ParsePriorityError, Priority, Task, TaskId};
pub use query::filter::{filter, is_expired, ParseStatusFilterError, StatusFilter, TaskQuery};
pub use query::stats::{stats, Stats};
pub use repo::task_file::{
    FileTaskStorage, MemoryTaskStorage, RecordError, StorageError, StorageResult, TaskStorage,
};
pub use service::task_store::{LoadReport, StoreError, StoreResult, TaskStore};
