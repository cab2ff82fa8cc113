//! Prompt construction for AI daily reviews.
//!
//! Provides the system prompt and turns a day's activity into the user
//! prompt sent to the provider. Output is fully deterministic for a given
//! [`ReviewContext`].

use std::fmt::Write;

use crate::stats::DailyStats;
use crate::storage::models::{LogEntry, Task};

/// Maximum number of log entries included in a prompt.
pub const MAX_PROMPT_LOGS: usize = 10;

/// Returns the system prompt that frames the model as a productivity coach.
pub fn system_prompt() -> &'static str {
    "You are a productivity coach. \
     Provide concise, actionable advice based on the user's daily work summary. \
     Be encouraging but honest."
}

/// Everything known about the day being reviewed.
#[derive(Debug, Clone, Default)]
pub struct ReviewContext {
    pub stats: DailyStats,
    /// GitHub commits for the day, when they could be fetched.
    pub commit_count: Option<u32>,
    pub tasks: Vec<Task>,
    /// Log entries in insertion order. Only the last
    /// [`MAX_PROMPT_LOGS`] are used.
    pub recent_logs: Vec<LogEntry>,
}

/// Builds the user prompt for a daily review.
///
/// Lists every numeric stat, the commit count when present, each task with
/// its status and the most recent log entries, then asks for what went
/// well, what to improve and suggestions for tomorrow.
pub fn compose_prompt(ctx: &ReviewContext) -> String {
    let stats = &ctx.stats;
    let mut out = String::new();

    out.push_str("Today's work summary:\n");
    let _ = writeln!(out, "- Tasks completed: {}", stats.tasks_completed);
    let _ = writeln!(out, "- Tasks pending: {}", stats.tasks_pending);
    let _ = writeln!(
        out,
        "- Focus sessions: {} ({} minutes total)",
        stats.focus_session_count, stats.total_focus_minutes
    );
    let _ = writeln!(out, "- Log entries: {}", stats.log_entry_count);
    if let Some(commits) = ctx.commit_count {
        let _ = writeln!(out, "- GitHub commits: {commits}");
    }

    out.push_str("\nTasks:\n");
    if ctx.tasks.is_empty() {
        out.push_str("- No tasks recorded today\n");
    } else {
        for task in &ctx.tasks {
            let status = if task.completed { "[done]" } else { "[pending]" };
            let _ = writeln!(out, "- {status} {}", task.task);
        }
    }

    let skip = ctx.recent_logs.len().saturating_sub(MAX_PROMPT_LOGS);
    let logs = &ctx.recent_logs[skip..];
    if !logs.is_empty() {
        out.push_str("\nWork log entries:\n");
        for log in logs {
            let _ = writeln!(out, "- {} {}", log.timestamp.format("%H:%M"), log.entry);
        }
    }

    out.push_str(
        "\nAnalyze this day. Provide:\n\
         1. What went well\n\
         2. Areas for improvement\n\
         3. Specific suggestions for tomorrow\n\
         Keep it concise and actionable.",
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    fn task(id: i64, text: &str, completed: bool) -> Task {
        Task {
            id,
            task: text.to_string(),
            completed,
            date_added: day(),
            date_completed: completed.then(day),
        }
    }

    fn log(id: i64, text: &str, minute: u32) -> LogEntry {
        LogEntry {
            id,
            entry: text.to_string(),
            date: day(),
            timestamp: day().and_hms_opt(9, minute, 0).expect("valid time"),
        }
    }

    fn sample_context() -> ReviewContext {
        ReviewContext {
            stats: DailyStats {
                tasks_completed: 1,
                tasks_pending: 1,
                focus_session_count: 2,
                total_focus_minutes: 50,
                log_entry_count: 1,
            },
            commit_count: Some(3),
            tasks: vec![task(1, "Write report", true), task(2, "Email Sam", false)],
            recent_logs: vec![log(1, "Drafted intro", 30)],
        }
    }

    #[test]
    fn test_system_prompt_mentions_coach() {
        assert!(system_prompt().contains("productivity coach"));
    }

    #[test]
    fn test_compose_prompt_includes_all_stats() {
        let prompt = compose_prompt(&sample_context());

        assert!(prompt.contains("Tasks completed: 1"));
        assert!(prompt.contains("Tasks pending: 1"));
        assert!(prompt.contains("Focus sessions: 2 (50 minutes total)"));
        assert!(prompt.contains("Log entries: 1"));
        assert!(prompt.contains("GitHub commits: 3"));
    }

    #[test]
    fn test_compose_prompt_lists_tasks_with_status() {
        let prompt = compose_prompt(&sample_context());
        assert!(prompt.contains("- [done] Write report"));
        assert!(prompt.contains("- [pending] Email Sam"));
        assert!(prompt.contains("- 09:30 Drafted intro"));
    }

    #[test]
    fn test_compose_prompt_without_commits_or_tasks() {
        let prompt = compose_prompt(&ReviewContext::default());
        assert!(!prompt.contains("GitHub commits"));
        assert!(prompt.contains("- No tasks recorded today"));
        assert!(!prompt.contains("Work log entries"));
        assert!(prompt.ends_with("Keep it concise and actionable."));
    }

    #[test]
    fn test_compose_prompt_keeps_most_recent_logs() {
        let mut ctx = ReviewContext::default();
        ctx.recent_logs = (0..15).map(|i| log(i, &format!("entry {i}"), i as u32)).collect();

        let prompt = compose_prompt(&ctx);
        assert!(!prompt.contains("entry 4\n"));
        assert!(prompt.contains("entry 5\n"));
        assert!(prompt.contains("entry 14\n"));
        let count = prompt.lines().filter(|l| l.contains(" entry ")).count();
        assert_eq!(count, MAX_PROMPT_LOGS);
    }

    #[test]
    fn test_compose_prompt_is_deterministic() {
        let ctx = sample_context();
        assert_eq!(compose_prompt(&ctx), compose_prompt(&ctx.clone()));
    }
}
