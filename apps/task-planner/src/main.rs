//! Task Planner - per-user tasks with timed reminders.
//!
//! Features:
//! - Tasks with due dates, subtasks, reminders and attachments
//! - Complete/skip tracking
//! - `watch` mode that fires due reminders once per task
//! - JSON persistence, one file per user

mod app;
mod ui;

use anyhow::{bail, Result};
use app::App;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use planner_core::{Config, Reminder};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Per-user task planner with timed reminders.
#[derive(Parser)]
#[command(name = "task-planner", version, about)]
struct Cli {
    /// Whose tasks to work on.
    #[arg(short, long, env = "TASK_PLANNER_USER")]
    user: String,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the task files (overrides config).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List tasks.
    List,
    /// Show one task in full.
    Show { task: usize },
    /// Append a new placeholder task.
    New,
    /// Edit title, description or due date.
    Edit {
        task: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due date as yyyy-mm-dd.
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Mark a task completed.
    Complete { task: usize },
    /// Mark a task skipped.
    Skip { task: usize },
    /// Clear completed/skipped.
    Reopen { task: usize },
    /// Delete a task.
    Delete { task: usize },
    /// Add a subtask.
    Subtask { task: usize, text: String },
    /// Add a reminder at "dd.mm.yyyy HH:MM".
    Remind {
        task: usize,
        date: String,
        time: String,
        text: String,
    },
    /// Attach an existing file by reference.
    Attach { task: usize, path: PathBuf },
    /// Remove an attachment.
    Detach { task: usize, attachment: usize },
    /// Run the reminder scheduler until interrupted.
    Watch {
        /// Seconds between checks (overrides config).
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::load(),
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.store.data_dir = Some(dir);
    }

    init_tracing(&config);

    if cli.user.trim().is_empty() {
        bail!("enter a user name");
    }

    let mut app = App::new(config, &cli.user)?;

    match cli.command.unwrap_or(Command::List) {
        Command::List => app.list(),
        Command::Show { task } => app.show(task)?,
        Command::New => app.create(),
        Command::Edit {
            task,
            title,
            description,
            due,
        } => app.edit(task, title, description, due)?,
        Command::Complete { task } => app.complete(task)?,
        Command::Skip { task } => app.skip(task)?,
        Command::Reopen { task } => app.reopen(task)?,
        Command::Delete { task } => app.delete(task)?,
        Command::Subtask { task, text } => app.add_subtask(task, &text)?,
        Command::Remind {
            task,
            date,
            time,
            text,
        } => app.add_reminder(task, parse_reminder_time(&date, &time)?, &text)?,
        Command::Attach { task, path } => app.attach(task, &path)?,
        Command::Detach { task, attachment } => app.detach(task, attachment)?,
        Command::Watch { interval } => app.watch(interval).await?,
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let fallback = config
        .log_level
        .clone()
        .unwrap_or_else(|| "task_planner=info,planner_core=info".to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&fallback))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_reminder_time(date: &str, time: &str) -> Result<NaiveDateTime> {
    Reminder::parse_at(date, time).map_err(|e| anyhow::anyhow!("invalid reminder time: {e}"))
}
