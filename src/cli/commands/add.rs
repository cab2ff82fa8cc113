//! Add command - add a task for today.

use anyhow::Result;
use colored::Colorize;

use crate::cli::{join_words, report_invalid};
use crate::storage::{validate_text, Database};

/// Arguments for the add command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex add Write the quarterly report\n    \
    reflex add \"Review PR #42\"")]
pub struct Args {
    /// Task description (words are joined with spaces)
    #[arg(required = true, value_name = "TEXT")]
    pub text: Vec<String>,
}

/// Executes the add command.
pub fn run(args: Args) -> Result<()> {
    let text = match validate_text(&join_words(&args.text)) {
        Ok(text) => text,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let db = Database::open_default()?;
    let id = db.add_task(&text)?;

    println!("{} {}", format!("Added task #{id}:").green(), text);
    Ok(())
}
