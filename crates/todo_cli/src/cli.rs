//! Command-line definition for the `todo` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use todo_core::{ParsePriorityError, Priority, StatusFilter, TaskId};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Track tasks in a flat text file")]
pub struct Cli {
    /// Task file to read and rewrite
    #[arg(long, global = true, env = "TODO_FILE", default_value = "todo_data.txt")]
    pub file: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "TODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files
    #[arg(long, global = true, env = "TODO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a new task
    Add(AddArgs),
    /// List tasks, optionally filtered
    List(ListArgs),
    /// Mark a task as completed
    Done { id: TaskId },
    /// Mark a task as active again
    Undo { id: TaskId },
    /// Delete a task
    Delete {
        id: TaskId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show task counts
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub description: String,

    /// Deadline as DD.MM.YYYY, or `-` for none
    #[arg(short, long, default_value = "-")]
    pub deadline: String,

    /// Priority: 0|1|2 or low|medium|high
    #[arg(short, long, default_value = "low")]
    pub priority: Priority,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// all|active|completed|expired
    #[arg(short, long, default_value = "all")]
    pub status: StatusFilter,

    /// any|low|medium|high (or 0|1|2)
    #[arg(short, long, default_value = "any", value_parser = parse_priority_filter)]
    pub priority: PriorityFilter,

    /// Keep tasks whose description contains this text (case-sensitive)
    #[arg(long, default_value = "")]
    pub search: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Priority criterion where `None` matches any priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityFilter(pub Option<Priority>);

fn parse_priority_filter(value: &str) -> Result<PriorityFilter, ParsePriorityError> {
    if value.trim().eq_ignore_ascii_case("any") {
        return Ok(PriorityFilter(None));
    }
    value.parse().map(|priority| PriorityFilter(Some(priority)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_defaults_to_no_deadline_and_low_priority() {
        let cli = Cli::try_parse_from(["todo", "add", "Buy milk"]).unwrap();
        let Commands::Add(args) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(args.description, "Buy milk");
        assert_eq!(args.deadline, "-");
        assert_eq!(args.priority, Priority::Low);
    }

    #[test]
    fn add_accepts_priority_index_and_rejects_out_of_range() {
        let cli = Cli::try_parse_from(["todo", "add", "x", "-p", "2", "-d", "01.01.2030"]).unwrap();
        let Commands::Add(args) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(args.priority, Priority::High);
        assert_eq!(args.deadline, "01.01.2030");

        assert!(Cli::try_parse_from(["todo", "add", "x", "--priority", "3"]).is_err());
    }

    #[test]
    fn list_parses_filters() {
        let cli = Cli::try_parse_from([
            "todo", "list", "--status", "expired", "--priority", "medium", "--search", "Buy",
        ])
        .unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.status, StatusFilter::ExpiredOnly);
        assert_eq!(args.priority, PriorityFilter(Some(Priority::Medium)));
        assert_eq!(args.search, "Buy");
    }

    #[test]
    fn list_defaults_match_everything() {
        let cli = Cli::try_parse_from(["todo", "list"]).unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.status, StatusFilter::All);
        assert_eq!(args.priority, PriorityFilter(None));
        assert!(args.search.is_empty());
    }

    #[test]
    fn global_file_flag_works_after_subcommand() {
        let cli = Cli::try_parse_from(["todo", "delete", "4", "--yes", "--file", "/tmp/t.txt"])
            .unwrap();
        assert_eq!(cli.file, PathBuf::from("/tmp/t.txt"));
        assert!(matches!(cli.command, Commands::Delete { id: 4, yes: true }));
    }
}
