//! Aggregate counts over a task collection.

use crate::model::date::TaskDate;
use crate::model::task::Task;
use crate::query::filter::is_expired;
use serde::Serialize;

/// Summary counts. `active + completed == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub expired: usize,
}

/// Computes [`Stats`] in a single pass.
pub fn stats(tasks: &[Task], today: TaskDate) -> Stats {
    let mut summary = tasks.iter().fold(Stats::default(), |mut acc, task| {
        acc.total += 1;
        if task.completed {
            acc.completed += 1;
        }
        if is_expired(task, today) {
            acc.expired += 1;
        }
        acc
    });
    summary.active = summary.total - summary.completed;
    summary
}
