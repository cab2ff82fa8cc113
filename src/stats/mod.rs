//! Daily statistics derived from the store.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::storage::Database;

/// Counts and durations for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub tasks_completed: u32,
    pub tasks_pending: u32,
    pub focus_session_count: u32,
    pub total_focus_minutes: u32,
    pub log_entry_count: u32,
}

impl DailyStats {
    /// Total number of tasks added that day.
    pub fn total_tasks(&self) -> u32 {
        self.tasks_completed + self.tasks_pending
    }

    /// Mean focus session length, or `None` without sessions.
    pub fn average_focus_minutes(&self) -> Option<f64> {
        if self.focus_session_count == 0 {
            None
        } else {
            Some(f64::from(self.total_focus_minutes) / f64::from(self.focus_session_count))
        }
    }
}

/// Summarizes one day from the store. An empty day is all zeros.
pub fn summarize(db: &Database, date: NaiveDate) -> Result<DailyStats> {
    let tasks = db.list_tasks(date)?;
    let sessions = db.list_focus_sessions(date)?;
    let logs = db.list_logs(date)?;

    let tasks_completed = tasks.iter().filter(|t| t.completed).count() as u32;
    let stats = DailyStats {
        tasks_completed,
        tasks_pending: tasks.len() as u32 - tasks_completed,
        focus_session_count: sessions.len() as u32,
        total_focus_minutes: sessions.iter().map(|s| s.duration).sum(),
        log_entry_count: logs.len() as u32,
    };

    tracing::debug!(?date, ?stats, "Summarized day");
    Ok(stats)
}
