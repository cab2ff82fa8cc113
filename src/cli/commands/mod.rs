//! CLI commands for Reflex.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// Add a task for today.
pub mod add;

/// Show commit tracking for the day.
pub mod commits;

/// Mark a task as completed.
pub mod complete;

/// Generate shell completion scripts.
pub mod completions;

/// Run a focus timer and record the session.
pub mod focus;

/// Short and extended help.
pub mod help;

/// List tasks for a day.
pub mod list;

/// Record a work log entry.
pub mod log;

/// Show supported and configured AI providers.
pub mod providers;

/// Produce a daily review.
pub mod review;

/// Show daily statistics.
pub mod stats;
