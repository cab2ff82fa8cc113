//! Log command - record a free-text work log entry.

use anyhow::Result;
use colored::Colorize;

use crate::cli::{join_words, report_invalid};
use crate::storage::{validate_text, Database};

/// Arguments for the log command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex log Fixed the flaky login test\n    \
    reflex log \"Meeting with design: agreed on v2 layout\"")]
pub struct Args {
    /// What you worked on (words are joined with spaces)
    #[arg(required = true, value_name = "TEXT")]
    pub text: Vec<String>,
}

/// Executes the log command.
pub fn run(args: Args) -> Result<()> {
    let entry = match validate_text(&join_words(&args.text)) {
        Ok(entry) => entry,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let db = Database::open_default()?;
    db.add_log(&entry)?;

    println!("{} {}", "Logged:".green(), entry);
    Ok(())
}
