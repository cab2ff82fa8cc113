//! Review command - produce a review of the day.
//!
//! Uses an AI provider when one is configured and falls back to a
//! rule-based review otherwise. Provider failures never fail the command.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::github::fetch_commit_count;
use crate::review::{self, DailyReview, ReviewOutcome};
use crate::storage::db::today;
use crate::storage::Database;

/// Arguments for the review command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex review                          Use the default or first available provider\n    \
    reflex review --provider anthropic     Use a specific provider\n    \
    reflex review -p openai -m gpt-4o      Override the model\n\n\
    Run 'reflex providers' to see which providers are configured.")]
pub struct Args {
    /// AI provider to use: openai, anthropic, gemini, ollama
    #[arg(short, long, value_name = "NAME")]
    #[arg(
        long_help = "AI provider to use. When given, this provider is used or the\n\
        command falls back to the basic review; no other provider is tried.\n\
        When omitted, DEFAULT_PROVIDER is used if available, otherwise the\n\
        first available provider in the order openai, anthropic, gemini, ollama."
    )]
    pub provider: Option<String>,

    /// Model to use instead of the configured or default one
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,
}

/// Executes the review command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open_default()?;

    let date = today();
    println!("{}", "Analyzing your day...".dimmed());

    let review = review::review_day(
        &db,
        &config,
        date,
        args.provider.as_deref(),
        args.model.as_deref(),
        |date| {
            fetch_commit_count(
                config.github_username.as_deref(),
                config.github_token.as_deref(),
                date,
            )
        },
    )?;

    print_review(&review);
    Ok(())
}

fn print_review(review: &DailyReview) {
    for notice in &review.notices {
        println!("{}", notice.yellow());
    }

    match &review.outcome {
        ReviewOutcome::Ai(response) => {
            println!();
            println!(
                "{} {}",
                format!("Daily review for {}", review.date).bold().cyan(),
                format!("({} / {})", response.provider.label(), response.model).dimmed()
            );
            println!();
            println!("{}", response.content);
            if let Some(tokens) = response.tokens_used {
                println!();
                println!("{}", format!("Tokens used: {tokens}").dimmed());
            }
        }
        ReviewOutcome::Offline { notice, review: text } => {
            println!("{}", notice.yellow());
            println!();
            println!("{}", format!("Basic review for {}", review.date).bold().cyan());
            println!();
            println!("{text}");
        }
    }
}
