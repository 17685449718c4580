//! Expiry check and stable task filtering.
//!
//! # Invariants
//! - Filtering never reorders its input.
//! - Criteria compose with logical AND.
//! - Text search is a case-sensitive substring match.

use crate::model::date::TaskDate;
use crate::model::task::{Priority, Task};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Completion-state criterion for [`filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    ActiveOnly,
    CompletedOnly,
    ExpiredOnly,
}

impl StatusFilter {
    fn matches(self, task: &Task, today: TaskDate) -> bool {
        match self {
            Self::All => true,
            Self::ActiveOnly => !task.completed,
            Self::CompletedOnly => task.completed,
            Self::ExpiredOnly => is_expired(task, today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusFilterError(pub String);

impl Display for ParseStatusFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status filter `{}`; expected all|active|completed|expired",
            self.0
        )
    }
}

impl std::error::Error for ParseStatusFilterError {}

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::ActiveOnly),
            "completed" | "done" => Ok(Self::CompletedOnly),
            "expired" | "overdue" => Ok(Self::ExpiredOnly),
            _ => Err(ParseStatusFilterError(value.to_string())),
        }
    }
}

/// Filter options; `TaskQuery::default()` matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: StatusFilter,
    /// `None` matches any priority.
    pub priority: Option<Priority>,
    /// Ignored when empty.
    pub search: String,
}

impl TaskQuery {
    fn matches(&self, task: &Task, today: TaskDate) -> bool {
        self.status.matches(task, today)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && (self.search.is_empty() || task.description.contains(self.search.as_str()))
    }
}

/// Returns whether an incomplete task's deadline is strictly before `today`.
///
/// Tasks without a deadline and completed tasks are never expired.
pub fn is_expired(task: &Task, today: TaskDate) -> bool {
    match task.deadline {
        Some(deadline) => !task.completed && deadline < today,
        None => false,
    }
}

/// Keeps tasks matching every criterion of `query`, in input order.
pub fn filter<'a>(tasks: &'a [Task], query: &TaskQuery, today: TaskDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| query.matches(task, today))
        .collect()
}
