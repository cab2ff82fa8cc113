//! Help and full-help commands.
//!
//! `help` prints the usual command overview. `full-help` adds every
//! subcommand's options plus the environment and config file reference.

use anyhow::Result;
use clap::Command;
use colored::Colorize;

use crate::config::{keys, Config};

/// Arguments for the help command.
#[derive(clap::Args)]
pub struct Args {}

/// Arguments for the full-help command.
#[derive(clap::Args)]
pub struct FullArgs {}

/// Environment variables and what they control.
const ENVIRONMENT: &[(&str, &str)] = &[
    (keys::OPENAI_API_KEY, "API key for OpenAI reviews"),
    (keys::OPENAI_MODEL, "OpenAI model (default gpt-4o-mini)"),
    (keys::ANTHROPIC_API_KEY, "API key for Anthropic reviews"),
    (keys::ANTHROPIC_MODEL, "Anthropic model (default claude-3-5-haiku-latest)"),
    (keys::GEMINI_API_KEY, "API key for Gemini reviews"),
    (keys::GEMINI_MODEL, "Gemini model (default gemini-1.5-flash)"),
    (keys::OLLAMA_MODEL, "Ollama model; enables the local provider"),
    (keys::OLLAMA_HOST, "Ollama server URL (default http://localhost:11434)"),
    (keys::OLLAMA_SERVER_URL, "Fallback for OLLAMA_HOST"),
    (keys::DEFAULT_PROVIDER, "Provider used when --provider is not given"),
    (keys::GITHUB_USERNAME, "GitHub user for commit tracking"),
    (keys::GITHUB_TOKEN, "GitHub token for commit tracking"),
    ("RUST_LOG", "Log filter, e.g. reflex=debug"),
];

/// Prints the short help.
pub fn run(cmd: &mut Command) -> Result<()> {
    cmd.print_help()?;
    Ok(())
}

/// Prints the extended help.
pub fn run_full(cmd: &mut Command) -> Result<()> {
    cmd.print_long_help()?;
    println!();

    for mut sub in subcommand_sections(cmd) {
        println!();
        println!("{}", sub.get_bin_name().unwrap_or_default().bold().underline());
        sub.print_long_help()?;
    }

    println!();
    println!("{}", "ENVIRONMENT".bold().underline());
    for (name, description) in ENVIRONMENT {
        println!("  {} {description}", format!("{name:<20}").cyan());
    }

    println!();
    println!("{}", "FILES".bold().underline());
    if let Ok(path) = Config::config_path() {
        println!("  {}", path.display());
        println!("      Optional YAML config; environment variables take precedence");
    }
    println!("  ./.env");
    if let Ok(dir) = crate::config::data_dir() {
        println!("  {}", dir.join(".env").display());
    }
    println!("      Optional KEY=value files; the process environment wins, then ./.env");
    if let Ok(dir) = crate::config::data_dir() {
        println!("  {}", dir.join("reflex.db").display());
        println!("      Local database of tasks, focus sessions and logs");
    }

    Ok(())
}

/// Subcommands shown by `full-help`, named the way they are invoked.
fn subcommand_sections(cmd: &Command) -> Vec<Command> {
    let bin = cmd.get_name().to_string();
    cmd.get_subcommands()
        .filter(|sub| !matches!(sub.get_name(), "help" | "full-help" | "completions"))
        .map(|sub| {
            let name = format!("{bin} {}", sub.get_name());
            sub.clone().bin_name(name)
        })
        .collect()
}
