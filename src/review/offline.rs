//! Rule-based review used when no AI provider can be reached.

use std::fmt::Write;

use crate::stats::DailyStats;

/// Sessions shorter than this on average get a nudge towards longer blocks.
const SHORT_SESSION_MINUTES: f64 = 15.0;

/// Sessions longer than this on average get a nudge towards breaks.
const LONG_SESSION_MINUTES: f64 = 45.0;

/// Writes a short review of the day from the stats alone.
pub fn offline_review(stats: &DailyStats) -> String {
    let mut out = String::new();

    if stats.tasks_completed > 0 {
        let _ = writeln!(
            out,
            "Great job completing {} task{}!",
            stats.tasks_completed,
            plural(stats.tasks_completed)
        );
    } else {
        out.push_str(
            "No tasks completed today. Consider breaking down large tasks into smaller ones.\n",
        );
    }

    match stats.average_focus_minutes() {
        Some(avg) => {
            let _ = writeln!(
                out,
                "You had {} focus session{} averaging {avg:.1} minutes.",
                stats.focus_session_count,
                plural(stats.focus_session_count)
            );
            if avg < SHORT_SESSION_MINUTES {
                out.push_str("Try longer focus sessions (25+ minutes) for deeper work.\n");
            } else if avg > LONG_SESSION_MINUTES {
                out.push_str("Consider shorter sessions with breaks to maintain focus.\n");
            }
        }
        None => {
            out.push_str("No focus sessions logged. Try starting with 25-minute focused work blocks.\n");
        }
    }

    if stats.log_entry_count > 0 {
        let _ = writeln!(
            out,
            "You made {} log entr{} - great for reflection!",
            stats.log_entry_count,
            if stats.log_entry_count == 1 { "y" } else { "ies" }
        );
    }

    out.push_str("\nTomorrow's focus:\n");
    if stats.tasks_pending > 0 {
        let _ = writeln!(
            out,
            "- Complete {} pending task{}",
            stats.tasks_pending,
            plural(stats.tasks_pending)
        );
    }
    out.push_str("- Start with a focus session\n");
    out.push_str("- Log your progress regularly");

    out
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
