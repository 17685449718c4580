//! Text and JSON output for task listings and statistics.

use anyhow::Result;
use crossterm::style::{style, Attribute, Color, Stylize};
use serde::Serialize;
use todo_core::{format_date, is_expired, Stats, Task, TaskDate};

const COL_ID: usize = 4;
const COL_TASK: usize = 28;
const COL_STATUS: usize = 8;
const COL_DEADLINE: usize = 10;
const COL_PRIORITY: usize = 8;

#[derive(Serialize)]
struct TaskJson<'a> {
    #[serde(flatten)]
    task: &'a Task,
    expired: bool,
}

/// Output settings for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub color: bool,
    pub today: TaskDate,
}

impl Renderer {
    pub fn print_tasks(&self, tasks: &[&Task]) {
        if tasks.is_empty() {
            println!("No tasks.");
            return;
        }

        println!("{}", self.bold(&header()));
        println!("{}", rule());
        for task in tasks {
            println!("{}", self.row(task));
        }
    }

    pub fn print_tasks_json(&self, tasks: &[&Task]) -> Result<()> {
        let items: Vec<TaskJson<'_>> = tasks
            .iter()
            .map(|task| TaskJson {
                task,
                expired: is_expired(task, self.today),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        Ok(())
    }

    pub fn print_stats(&self, stats: &Stats) {
        self.print_line(&stats_line(stats), Color::Cyan);
    }

    pub fn print_stats_json(&self, stats: &Stats) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(stats)?);
        Ok(())
    }

    pub fn print_success(&self, message: &str) {
        self.print_line(message, Color::Green);
    }

    fn print_line(&self, text: &str, color: Color) {
        if self.color {
            println!("{}", style(text).with(color));
        } else {
            println!("{text}");
        }
    }

    fn row(&self, task: &Task) -> String {
        let expired = is_expired(task, self.today);
        let status = format!("{:<COL_STATUS$}", if task.completed { "[x]" } else { "[ ]" });
        let status = match (self.color, task.completed, expired) {
            (false, _, _) => status,
            (true, true, _) => style(status).with(Color::Green).to_string(),
            (true, false, true) => style(status).with(Color::Red).to_string(),
            (true, false, false) => status,
        };

        format!(
            "{:<COL_ID$} {:<COL_TASK$} {} {:<COL_DEADLINE$} {:<COL_PRIORITY$}",
            task.id,
            truncate(&task.description, COL_TASK),
            status,
            format_date(task.deadline),
            task.priority.as_str(),
        )
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            style(text).attribute(Attribute::Bold).to_string()
        } else {
            text.to_string()
        }
    }
}

fn header() -> String {
    format!(
        "{:<COL_ID$} {:<COL_TASK$} {:<COL_STATUS$} {:<COL_DEADLINE$} {:<COL_PRIORITY$}",
        "ID", "TASK", "STATUS", "DEADLINE", "PRIORITY"
    )
}

fn rule() -> String {
    "-".repeat(COL_ID + COL_TASK + COL_STATUS + COL_DEADLINE + COL_PRIORITY + 4)
}

fn stats_line(stats: &Stats) -> String {
    format!(
        "Total: {} | Completed: {} | Active: {} | Expired: {}",
        stats.total, stats.completed, stats.active, stats.expired
    )
}

/// Shortens to `max` characters, replacing line breaks with spaces.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut short: String = flat.chars().take(max.saturating_sub(3)).collect();
    short.push_str("...");
    short
}
