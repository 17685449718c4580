//! `todo` command-line front end.
//!
//! # Responsibility
//! - Convert arguments into typed store and query calls.
//! - Confirm destructive actions and render results.

mod cli;
mod config;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{AddArgs, Cli, Commands, ListArgs};
use config::AppConfig;
use log::warn;
use render::Renderer;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use todo_core::{
    filter, init_logging, parse_date, stats, FileTaskStorage, TaskDate, TaskId, TaskQuery,
    TaskStorage, TaskStore, NO_DATE,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);
    start_logging(&config);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(config: &AppConfig) {
    let Some(log_dir) = config.log_dir.as_deref() else {
        eprintln!("warning: no log directory available; logging disabled");
        return;
    };
    if let Err(err) = init_logging(&config.log_level, log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn run(command: Commands, config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let renderer = Renderer {
        color: io::stdout().is_terminal(),
        today: store.today(),
    };

    match command {
        Commands::Add(args) => add(&mut store, &renderer, args),
        Commands::List(args) => list(&store, &renderer, args),
        Commands::Done { id } => set_completed(&mut store, &renderer, id, true),
        Commands::Undo { id } => set_completed(&mut store, &renderer, id, false),
        Commands::Delete { id, yes } => {
            delete(&mut store, &renderer, id, yes, &mut io::stdin().lock())
        }
        Commands::Stats { json } => {
            let summary = stats(store.all(), renderer.today);
            if json {
                renderer.print_stats_json(&summary)
            } else {
                renderer.print_stats(&summary);
                Ok(())
            }
        }
    }
}

fn open_store(config: &AppConfig) -> Result<TaskStore<FileTaskStorage>> {
    let (store, report) = TaskStore::open(FileTaskStorage::new(&config.data_file))
        .with_context(|| format!("failed to load `{}`", config.data_file.display()))?;
    if report.skipped > 0 {
        eprintln!(
            "warning: skipped {} malformed line(s) in `{}`",
            report.skipped,
            config.data_file.display()
        );
    }
    Ok(store)
}

/// Parses a deadline argument; `Err` carries the text that was not a date.
fn resolve_deadline(raw: &str) -> Result<Option<TaskDate>, &str> {
    match parse_date(raw) {
        Some(date) => Ok(Some(date)),
        None if matches!(raw.trim(), "" | NO_DATE) => Ok(None),
        None => Err(raw),
    }
}

fn add<S: TaskStorage>(store: &mut TaskStore<S>, renderer: &Renderer, args: AddArgs) -> Result<()> {
    let deadline = resolve_deadline(&args.deadline).unwrap_or_else(|raw| {
        warn!("event=cli_add module=cli status=invalid_deadline");
        eprintln!("warning: `{raw}` is not a DD.MM.YYYY date; saving without a deadline");
        None
    });

    let id = store
        .add(&args.description, deadline, args.priority)
        .context("failed to add task")?;
    renderer.print_success(&format!("Added task {id}."));
    Ok(())
}

fn list<S: TaskStorage>(store: &TaskStore<S>, renderer: &Renderer, args: ListArgs) -> Result<()> {
    let query = TaskQuery {
        status: args.status,
        priority: args.priority.0,
        search: args.search,
    };
    let tasks = filter(store.all(), &query, renderer.today);
    if args.json {
        return renderer.print_tasks_json(&tasks);
    }
    renderer.print_tasks(&tasks);
    Ok(())
}

fn set_completed<S: TaskStorage>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    id: TaskId,
    completed: bool,
) -> Result<()> {
    let found = store
        .toggle(id, completed)
        .with_context(|| format!("failed to update task {id}"))?;
    if !found {
        bail!("task {id} not found");
    }
    let state = if completed { "completed" } else { "active" };
    renderer.print_success(&format!("Task {id} marked {state}."));
    Ok(())
}

fn delete<S: TaskStorage>(
    store: &mut TaskStore<S>,
    renderer: &Renderer,
    id: TaskId,
    yes: bool,
    input: &mut impl BufRead,
) -> Result<()> {
    if store.get(id).is_none() {
        bail!("task {id} not found");
    }
    let prompt = format!("Delete task {id}? (y/n): ");
    if !yes && !confirm(&prompt, input, &mut io::stdout())? {
        println!("Cancelled.");
        return Ok(());
    }
    let removed = store
        .delete(id)
        .with_context(|| format!("failed to delete task {id}"))?;
    if !removed {
        bail!("task {id} not found");
    }
    renderer.print_success(&format!("Task {id} deleted."));
    Ok(())
}

/// Asks a yes/no question; anything but `y`/`yes` (including EOF) is a no.
fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use todo_core::{MemoryTaskStorage, Priority};

    fn fixed_today() -> TaskDate {
        TaskDate::new(1, 1, 2025)
    }

    fn renderer() -> Renderer {
        Renderer {
            color: false,
            today: fixed_today(),
        }
    }

    fn store_with(descriptions: &[&str]) -> TaskStore<MemoryTaskStorage> {
        let mut store = TaskStore::with_clock(MemoryTaskStorage::new(), fixed_today);
        for description in descriptions {
            store.add(description, None, Priority::Low).unwrap();
        }
        store
    }

    #[test]
    fn confirm_accepts_only_yes_answers() {
        let mut output = Vec::new();
        assert!(confirm("ok? ", &mut Cursor::new("Y\n"), &mut output).unwrap());
        assert!(confirm("ok? ", &mut Cursor::new("yes\n"), &mut output).unwrap());
        assert!(!confirm("ok? ", &mut Cursor::new("n\n"), &mut output).unwrap());
        assert!(!confirm("ok? ", &mut Cursor::new(""), &mut output).unwrap());
        assert_eq!(String::from_utf8(output).unwrap(), "ok? ".repeat(4));
    }

    #[test]
    fn resolve_deadline_separates_absent_from_invalid() {
        assert_eq!(resolve_deadline("-"), Ok(None));
        assert_eq!(resolve_deadline(""), Ok(None));
        assert_eq!(resolve_deadline("02.03.2025"), Ok(Some(TaskDate::new(2, 3, 2025))));
        assert_eq!(resolve_deadline("soon"), Err("soon"));
    }

    #[test]
    fn add_with_invalid_deadline_saves_without_one() {
        let mut store = store_with(&[]);
        let args = AddArgs {
            description: "Call mom".to_string(),
            deadline: "next week".to_string(),
            priority: Priority::High,
        };

        add(&mut store, &renderer(), args).unwrap();

        let task = &store.all()[0];
        assert_eq!(task.description, "Call mom");
        assert_eq!(task.deadline, None);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn delete_unknown_id_fails_without_prompting() {
        let mut store = store_with(&["one"]);
        let mut input = Cursor::new("y\n");

        let err = delete(&mut store, &renderer(), 9, false, &mut input).unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert_eq!(input.position(), 0);
        assert_eq!(store.storage().write_count(), 1);
    }

    #[test]
    fn declined_delete_keeps_task() {
        let mut store = store_with(&["one"]);

        delete(&mut store, &renderer(), 1, false, &mut Cursor::new("n\n")).unwrap();

        assert_eq!(store.all().len(), 1);
        assert_eq!(store.storage().write_count(), 1);
    }

    #[test]
    fn confirmed_delete_removes_task() {
        let mut store = store_with(&["one", "two"]);

        delete(&mut store, &renderer(), 1, false, &mut Cursor::new("y\n")).unwrap();
        delete(&mut store, &renderer(), 2, true, &mut Cursor::new("")).unwrap();

        assert!(store.all().is_empty());
        assert_eq!(store.storage().write_count(), 4);
    }

    #[test]
    fn toggle_unknown_id_is_an_error() {
        let mut store = store_with(&["one"]);
        let err = set_completed(&mut store, &renderer(), 2, true).unwrap_err();
        assert!(err.to_string().contains("task 2 not found"));
        assert!(set_completed(&mut store, &renderer(), 1, true).is_ok());
        assert!(store.all()[0].completed);
    }
}
