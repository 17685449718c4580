//! Task store use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory task collection.
//! - Allocate ids and stamp creation dates.
//! - Mirror every mutation to the backing storage.
//!
//! # Invariants
//! - Ids are strictly increasing within one store instance; deletes never
//!   rewind the counter.
//! - `load` derives the next id as max stored id + 1, so an id deleted from
//!   the top of the collection can be allocated again after a reload.
//! - `all()` preserves load/creation order.
//! - A failed save rolls the in-memory mutation back.
//! - Descriptions are never written to logs.

use crate::model::date::TaskDate;
use crate::model::task::{Priority, Task, TaskId};
use crate::repo::task_file::{decode_line, encode_tasks, StorageError, TaskStorage};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for task mutations and persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Description is empty after trimming.
    EmptyDescription,
    /// Every `TaskId` value has already been allocated.
    IdSpaceExhausted,
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "task description cannot be empty"),
            Self::IdSpaceExhausted => write!(f, "no task ids left to allocate"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Outcome of [`TaskStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    /// Lines that could not be decoded and were dropped.
    pub skipped: usize,
}

/// In-memory task collection mirrored to a [`TaskStorage`].
pub struct TaskStore<S: TaskStorage> {
    storage: S,
    tasks: Vec<Task>,
    next_id: TaskId,
    clock: fn() -> TaskDate,
}

impl<S: TaskStorage> TaskStore<S> {
    /// Creates an empty store. Call [`TaskStore::load`] to read existing data.
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, TaskDate::today)
    }

    /// Creates an empty store that reads "today" from `clock`.
    pub fn with_clock(storage: S, clock: fn() -> TaskDate) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
            next_id: 1,
            clock,
        }
    }

    /// Creates a store and loads the backing storage into it.
    pub fn open(storage: S) -> StoreResult<(Self, LoadReport)> {
        let mut store = Self::new(storage);
        let report = store.load()?;
        Ok((store, report))
    }

    /// Replaces the in-memory collection with the stored one.
    ///
    /// Missing storage yields an empty store. Malformed lines are skipped
    /// and counted; blank lines are ignored. Duplicate ids keep the first
    /// occurrence.
    ///
    /// # Errors
    /// - Returns `StoreError::Storage` when existing storage cannot be read.
    pub fn load(&mut self) -> StoreResult<LoadReport> {
        let started_at = Instant::now();
        let contents = match self.storage.read() {
            Ok(contents) => contents,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let today = self.today();
        let mut tasks = Vec::new();
        let mut seen = HashSet::new();
        let mut report = LoadReport::default();

        for (index, line) in contents.as_deref().unwrap_or_default().lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            match decode_line(line, today) {
                Ok(decoded) => {
                    if !seen.insert(decoded.task.id) {
                        warn!(
                            "event=store_record_skipped module=store line={} reason=duplicate_id id={}",
                            line_no, decoded.task.id
                        );
                        report.skipped += 1;
                        continue;
                    }
                    if decoded.created_defaulted {
                        warn!(
                            "event=store_record_defaulted module=store line={} field=created",
                            line_no
                        );
                    }
                    tasks.push(decoded.task);
                }
                Err(reason) => {
                    warn!(
                        "event=store_record_skipped module=store line={} reason=\"{}\"",
                        line_no, reason
                    );
                    report.skipped += 1;
                }
            }
        }

        report.loaded = tasks.len();
        self.next_id = tasks
            .iter()
            .map(|task| task.id)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        self.tasks = tasks;

        info!(
            "event=store_load module=store status=ok present={} loaded={} skipped={} duration_ms={}",
            contents.is_some(),
            report.loaded,
            report.skipped,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Writes the whole collection to storage.
    ///
    /// # Errors
    /// - Returns `StoreError::Storage` when the write fails.
    pub fn save(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        let contents = encode_tasks(&self.tasks);
        match self.storage.write(&contents) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok tasks={} duration_ms={}",
                    self.tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error tasks={} duration_ms={} error={}",
                    self.tasks.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Creates an active task dated today and persists it.
    ///
    /// # Errors
    /// - `StoreError::EmptyDescription` for blank descriptions; nothing is written.
    /// - `StoreError::Storage` when persistence fails; the task is not kept.
    pub fn add(
        &mut self,
        description: &str,
        deadline: Option<TaskDate>,
        priority: Priority,
    ) -> StoreResult<TaskId> {
        if description.trim().is_empty() {
            return Err(StoreError::EmptyDescription);
        }
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;

        let created = self.today();
        self.tasks
            .push(Task::new(id, description, created, deadline, priority));
        self.next_id = next_id;

        if let Err(err) = self.save() {
            self.tasks.pop();
            self.next_id = id;
            return Err(err);
        }

        info!(
            "event=task_add module=store status=ok id={} priority={} has_deadline={}",
            id,
            priority,
            deadline.is_some()
        );
        Ok(id)
    }

    /// Removes the task with `id`. Persists only when a task was removed.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<bool> {
        let Some(position) = self.position(id) else {
            debug!("event=task_delete module=store status=not_found id={}", id);
            return Ok(false);
        };

        let removed = self.tasks.remove(position);
        if let Err(err) = self.save() {
            self.tasks.insert(position, removed);
            return Err(err);
        }

        info!("event=task_delete module=store status=ok id={}", id);
        Ok(true)
    }

    /// Sets the completion flag of `id`. Persists only when the task exists.
    pub fn toggle(&mut self, id: TaskId, completed: bool) -> StoreResult<bool> {
        let Some(position) = self.position(id) else {
            debug!("event=task_toggle module=store status=not_found id={}", id);
            return Ok(false);
        };

        let previous = self.tasks[position].completed;
        self.tasks[position].completed = completed;
        if let Err(err) = self.save() {
            self.tasks[position].completed = previous;
            return Err(err);
        }

        info!(
            "event=task_toggle module=store status=ok id={} completed={}",
            id, completed
        );
        Ok(true)
    }

    /// Read-only snapshot in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Current date according to the store clock.
    pub fn today(&self) -> TaskDate {
        (self.clock)()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}
