//! Command-line interface for Reflex.
//!
//! Each subcommand lives in [`commands`] and works against the local
//! database, the resolved configuration, and (for reviews and commits)
//! remote APIs.

use colored::Colorize;

use crate::storage::ValidationError;

/// Individual CLI command implementations.
pub mod commands;

/// Output format selection shared by listing commands.
pub mod format;

pub use format::OutputFormat;

/// Prints a rejected input message. Nothing is written in that case.
pub fn report_invalid(err: &ValidationError) {
    println!("{} {err}", "Error:".red().bold());
}

/// Joins positional words into one line of text.
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
