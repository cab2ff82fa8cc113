//! Providers command - show supported and configured AI providers.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::review::{self, provider, ProviderKind};

/// Arguments for the providers command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex providers\n\n\
    Keys can be set in the environment or in ~/.reflex/config.yaml.")]
pub struct Args {}

/// Executes the providers command.
pub fn run(_args: Args) -> Result<()> {
    let config = Config::load()?;
    let available = review::available_providers(&config);

    println!("{}", "AI providers".bold());
    println!();

    for kind in ProviderKind::ALL {
        let model = review::settings_for(&config, kind, None)
            .map(|s| s.model)
            .unwrap_or_else(|_| provider::default_model(kind).to_string());

        if available.contains(&kind) {
            println!(
                "  {} {:<10} {}",
                "✓".green(),
                kind.to_string(),
                format!("model: {model} (set {} to change)", kind.model_env()).dimmed()
            );
        } else {
            println!(
                "  {} {:<10} {}",
                "✗".red(),
                kind.to_string(),
                format!("set {}", kind.setup_hint()).dimmed()
            );
        }
    }

    println!();
    match config.default_provider.as_deref() {
        None => println!("Default provider: {}", "(not set)".dimmed()),
        Some(name) => match name.parse::<ProviderKind>() {
            Ok(kind) if available.contains(&kind) => {
                println!("Default provider: {}", kind.to_string().cyan())
            }
            Ok(kind) => println!(
                "Default provider: {} {}",
                kind.to_string().yellow(),
                "(not configured)".yellow()
            ),
            Err(_) => println!(
                "Default provider: {} {}",
                name.red(),
                format!("(unsupported; valid: {})", ProviderKind::valid_names()).red()
            ),
        },
    }

    if available.is_empty() {
        println!();
        println!(
            "{}",
            "No provider configured. 'reflex review' will use the basic review.".yellow()
        );
    }

    Ok(())
}
