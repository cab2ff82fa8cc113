//! Focus command - run a focus timer and record the session.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::cli::report_invalid;
use crate::config::Config;
use crate::focus::{self, FocusTimer, TimerState};
use crate::storage::Database;

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 30;

/// Arguments for the focus command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    reflex focus         25-minute session (or focus_minutes from config)\n    \
    reflex focus 50      50-minute session\n\n\
    Press Ctrl+C to stop early. Whole minutes spent are still recorded.")]
pub struct Args {
    /// Session length in minutes
    #[arg(value_name = "MINUTES")]
    pub minutes: Option<u32>,
}

/// Executes the focus command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let minutes = args.minutes.unwrap_or_else(|| config.focus_minutes());

    let mut timer = match FocusTimer::new(minutes) {
        Ok(timer) => timer,
        Err(e) => {
            report_invalid(&e);
            return Ok(());
        }
    };

    let db = Database::open_default()?;

    println!(
        "{} {minutes} minute{}. Press Ctrl+C to stop early.",
        "Focus session started:".bold().cyan(),
        if minutes == 1 { "" } else { "s" }
    );

    let target = timer.target();
    let outcome = focus::run_until_interrupted(&mut timer, |elapsed| {
        print!("\r{}", render_progress(elapsed, target));
        let _ = std::io::stdout().flush();
    })?;
    println!();

    match outcome.minutes_to_record() {
        Some(recorded) => {
            db.record_focus_session(recorded)?;
            if outcome.state == TimerState::Completed {
                println!(
                    "{}",
                    format!("Focus session complete! {recorded} minutes recorded.").green()
                );
            } else {
                println!(
                    "{}",
                    format!("Focus session stopped early. {recorded} minute(s) recorded.")
                        .yellow()
                );
            }
        }
        None => {
            println!(
                "{}",
                "Focus session stopped before a full minute. Nothing recorded.".yellow()
            );
        }
    }

    Ok(())
}

/// Renders `[#####-----]  50%  12:30 left` for the given progress.
fn render_progress(elapsed: Duration, target: Duration) -> String {
    let ratio = if target.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / target.as_secs_f64()).clamp(0.0, 1.0)
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    let remaining = target.saturating_sub(elapsed).as_secs();

    format!(
        "[{}{}] {:>3}%  {:02}:{:02} left",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        (ratio * 100.0).round() as u32,
        remaining / 60,
        remaining % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_progress_start() {
        let bar = render_progress(Duration::ZERO, Duration::from_secs(25 * 60));
        assert_eq!(bar, format!("[{}]   0%  25:00 left", "-".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_render_progress_halfway() {
        let bar = render_progress(Duration::from_secs(300), Duration::from_secs(600));
        assert!(bar.starts_with(&format!("[{}{}]", "#".repeat(15), "-".repeat(15))));
        assert!(bar.ends_with(" 50%  05:00 left"));
    }

    #[test]
    fn test_render_progress_done() {
        let bar = render_progress(Duration::from_secs(61), Duration::from_secs(60));
        assert_eq!(bar, format!("[{}] 100%  00:00 left", "#".repeat(BAR_WIDTH)));
    }
}
