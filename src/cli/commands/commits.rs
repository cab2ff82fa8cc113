//! Track-commits command - list the day's GitHub commits.

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;

use crate::config::Config;
use crate::github::CommitFetcher;
use crate::storage::db::today;

/// Arguments for the track-commits command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex track-commits                      Today's commits\n    \
    reflex track-commits --date 2026-03-02    Commits from a past day\n\n\
    Requires GITHUB_USERNAME and GITHUB_TOKEN.")]
pub struct Args {
    /// Day to look up (defaults to today)
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

/// Executes the track-commits command.
///
/// Missing credentials and API failures are reported, not returned.
pub fn run(args: Args) -> Result<()> {
    let date = args.date.unwrap_or_else(today);
    let config = Config::load()?;

    let (Some(username), Some(token)) = (
        config.github_username.as_deref(),
        config.github_token.as_deref(),
    ) else {
        println!(
            "{}",
            "GitHub credentials not configured. Set GITHUB_USERNAME and GITHUB_TOKEN.".yellow()
        );
        return Ok(());
    };

    let search = CommitFetcher::new().and_then(|f| f.search_commits(username, token, date));
    let search = match search {
        Ok(search) => search,
        Err(e) => {
            println!("{} {e}", "Could not fetch commits:".red());
            return Ok(());
        }
    };

    println!(
        "{}",
        format!("GitHub commits for {username} on {date}: {}", search.total_count).bold()
    );
    for commit in &search.commits {
        let time = commit
            .committed_at
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string());
        println!("  {} {}", time.dimmed(), commit.message);
    }
    if search.commits.len() < search.total_count as usize {
        println!(
            "{}",
            format!("  ... and {} more", search.total_count as usize - search.commits.len())
                .dimmed()
        );
    }

    Ok(())
}
