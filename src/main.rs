use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod focus;
mod github;
mod review;
mod stats;
mod storage;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "reflex")]
#[command(version)]
#[command(disable_help_subcommand = true)]
#[command(about = "Productivity tracker for the terminal: tasks, focus sessions, work logs and daily reviews")]
#[command(long_about = "Reflex keeps a local record of your day: tasks you add and complete,\n\
    timed focus sessions, and free-text work log entries. At the end of\n\
    the day it can review your progress with an AI provider (OpenAI,\n\
    Anthropic, Gemini or a local Ollama) or, without one, with a built-in\n\
    rule-based review.")]
#[command(after_help = "EXAMPLES:\n    \
    reflex add Write the report    Add a task for today\n    \
    reflex list                    Show today's tasks\n    \
    reflex complete 1              Mark task #1 as done\n    \
    reflex focus 25                Start a 25-minute focus session\n    \
    reflex log Drafted intro       Record what you worked on\n    \
    reflex stats                   Show today's numbers\n    \
    reflex review                  Get a review of your day\n\n\
    For more information about a command, run 'reflex <command> --help'\n\
    or 'reflex full-help' for everything at once.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Add a task for today
    Add(commands::add::Args),

    /// Mark a task as completed
    #[command(long_about = "Marks a pending task as completed today. Unknown ids and tasks\n\
        that are already completed are reported and left unchanged.")]
    Complete(commands::complete::Args),

    /// List tasks for today or another day
    #[command(alias = "list-tasks")]
    List(commands::list::Args),

    /// Record a work log entry
    Log(commands::log::Args),

    /// Start a focus timer
    #[command(alias = "start-focus")]
    #[command(long_about = "Runs a countdown with a progress bar. When it finishes, the full\n\
        duration is recorded as a focus session. Press Ctrl+C to stop early;\n\
        whole minutes already spent are recorded if there is at least one.")]
    Focus(commands::focus::Args),

    /// Show statistics for today or another day
    #[command(long_about = "Shows tasks completed and pending, focus sessions and minutes,\n\
        log entries and, when GITHUB_USERNAME and GITHUB_TOKEN are set,\n\
        the number of commits you made that day.")]
    Stats(commands::stats::Args),

    /// Review your day with AI, or with the built-in review
    #[command(alias = "ai-review")]
    #[command(long_about = "Summarizes today's tasks, focus sessions, log entries and commits\n\
        and asks an AI provider for feedback. If no provider is configured\n\
        or the request fails, a rule-based review is shown instead.")]
    Review(commands::review::Args),

    /// Show supported and configured AI providers
    Providers(commands::providers::Args),

    /// List your GitHub commits for a day
    #[command(alias = "commits")]
    TrackCommits(commands::commits::Args),

    /// Generate shell completion scripts
    Completions(commands::completions::Args),

    /// Show the command overview
    Help(commands::help::Args),

    /// Show every command's options, environment variables and files
    FullHelp(commands::help::FullArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "reflex=debug"
    } else {
        "reflex=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let Some(command) = cli.command else {
        return commands::help::run(&mut Cli::command());
    };

    match command {
        Commands::Add(args) => commands::add::run(args),
        Commands::Complete(args) => commands::complete::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Log(args) => commands::log::run(args),
        Commands::Focus(args) => commands::focus::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Review(args) => commands::review::run(args),
        Commands::Providers(args) => commands::providers::run(args),
        Commands::TrackCommits(args) => commands::commits::run(args),
        Commands::Completions(args) => commands::completions::run(args, &mut Cli::command()),
        Commands::Help(_) => commands::help::run(&mut Cli::command()),
        Commands::FullHelp(_) => commands::help::run_full(&mut Cli::command()),
    }
}
