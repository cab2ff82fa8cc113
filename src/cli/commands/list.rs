//! List command - show the tasks added on a day.

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::storage::db::today;
use crate::storage::{Database, Task};

/// Arguments for the list command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex list                      Today's tasks\n    \
    reflex list --date 2026-03-02    Tasks added on a past day\n    \
    reflex list --format json        Output as JSON")]
pub struct Args {
    /// Day to list (defaults to today)
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the list command.
pub fn run(args: Args) -> Result<()> {
    let date = args.date.unwrap_or_else(today);
    let db = Database::open_default()?;
    let tasks = db.list_tasks(date)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        OutputFormat::Text => print_tasks(date, &tasks),
    }

    Ok(())
}

fn print_tasks(date: NaiveDate, tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", format!("No tasks for {date}.").dimmed());
        println!();
        println!("Add one with 'reflex add <text>'.");
        return;
    }

    println!("{}", format!("Tasks for {date}").bold());
    for task in tasks {
        let id = format!("#{:<4}", task.id);
        if task.completed {
            println!("  {} {} {}", "[x]".green(), id.cyan(), task.task.dimmed());
        } else {
            println!("  {} {} {}", "[ ]".yellow(), id.cyan(), task.task);
        }
    }

    let done = tasks.iter().filter(|t| t.completed).count();
    println!();
    println!("{}", format!("{done}/{} completed", tasks.len()).dimmed());
}
