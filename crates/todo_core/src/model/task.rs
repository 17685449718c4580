//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record tracked by the store.
//! - Define the closed priority enumeration and its persisted indices.
//!
//! # Invariants
//! - `id` is positive and never reused by the store that allocated it.
//! - `created` is always present; `deadline` is optional.
//! - Only `completed` changes after creation.

use crate::model::date::TaskDate;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-allocated task identifier.
pub type TaskId = u32;

/// Task urgency. Persisted as index 0/1/2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Returns the persisted index.
    pub fn index(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Maps a persisted or user-entered index; out-of-range values are `None`.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text is neither a priority index nor a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError(pub String);

impl Display for ParsePriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid priority `{}`; expected 0|1|2 or low|medium|high",
            self.0
        )
    }
}

impl std::error::Error for ParsePriorityError {}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if let Ok(index) = normalized.parse::<i64>() {
            return Self::from_index(index).ok_or_else(|| ParsePriorityError(value.to_string()));
        }
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_string())),
        }
    }
}

/// One tracked to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub completed: bool,
    pub created: TaskDate,
    /// `None` means the task has no deadline.
    pub deadline: Option<TaskDate>,
    pub priority: Priority,
}

impl Task {
    /// Creates an active task.
    pub fn new(
        id: TaskId,
        description: impl Into<String>,
        created: TaskDate,
        deadline: Option<TaskDate>,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
            created,
            deadline,
            priority,
        }
    }
}
