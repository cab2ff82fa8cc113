//! Stats command - show counts for a day.
//!
//! Shows completed and pending tasks, focus time, log entries and, when
//! GitHub credentials are configured, the day's commit count.

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::github::{fetch_commit_count, CommitCount};
use crate::stats::{self, DailyStats};
use crate::storage::db::today;
use crate::storage::Database;

/// Arguments for the stats command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex stats                      Today's stats\n    \
    reflex stats --date 2026-03-02    Stats for a past day\n    \
    reflex stats --format json        Output as JSON\n\n\
    Set GITHUB_USERNAME and GITHUB_TOKEN to include commit counts.")]
pub struct Args {
    /// Day to summarize (defaults to today)
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// JSON shape of the stats output.
#[derive(Serialize)]
struct StatsReport {
    date: NaiveDate,
    #[serde(flatten)]
    stats: DailyStats,
    github_commits: Option<u32>,
}

/// Executes the stats command.
pub fn run(args: Args) -> Result<()> {
    let date = args.date.unwrap_or_else(today);
    let config = Config::load()?;
    let db = Database::open_default()?;

    let stats = stats::summarize(&db, date)?;
    let commits = fetch_commit_count(
        config.github_username.as_deref(),
        config.github_token.as_deref(),
        date,
    );

    match args.format {
        OutputFormat::Json => {
            let report = StatsReport {
                date,
                stats,
                github_commits: commits.value(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_stats(date, &stats, &commits),
    }

    Ok(())
}

fn print_stats(date: NaiveDate, stats: &DailyStats, commits: &CommitCount) {
    println!("{}", format!("Stats for {date}").bold());
    println!();
    println!("  Tasks completed:  {}", stats.tasks_completed.to_string().green());
    println!("  Tasks pending:    {}", stats.tasks_pending.to_string().yellow());
    println!(
        "  Focus sessions:   {} ({} minutes)",
        stats.focus_session_count, stats.total_focus_minutes
    );
    println!("  Log entries:      {}", stats.log_entry_count);

    let commits_display = match commits {
        CommitCount::Count(n) => n.to_string().cyan().to_string(),
        CommitCount::Unavailable(_) => "N/A".dimmed().to_string(),
    };
    println!("  GitHub commits:   {commits_display}");
}
