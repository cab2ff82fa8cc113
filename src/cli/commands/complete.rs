//! Complete command - mark a task as completed.

use anyhow::Result;
use colored::Colorize;

use crate::storage::{Database, TaskCompletion};

/// Arguments for the complete command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex complete 3    Mark task #3 as done\n\n\
    Task ids are shown by 'reflex list'.")]
pub struct Args {
    /// Id of the task to complete
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// Executes the complete command.
///
/// Unknown and already-completed ids are reported without changing
/// anything.
pub fn run(args: Args) -> Result<()> {
    let db = Database::open_default()?;

    match db.complete_task(args.id)? {
        TaskCompletion::Completed(_) => {
            let task = db.get_task(args.id)?;
            let text = task.map(|t| t.task).unwrap_or_default();
            println!("{} {}", format!("Completed task #{}:", args.id).green(), text);
        }
        TaskCompletion::AlreadyCompleted => {
            println!(
                "{}",
                format!("Task #{} is already completed.", args.id).yellow()
            );
        }
        TaskCompletion::NotFound => {
            println!("{} Task #{} not found.", "Error:".red().bold(), args.id);
        }
    }

    Ok(())
}
