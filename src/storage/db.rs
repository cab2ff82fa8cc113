//! SQLite storage layer for Reflex

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::models::{
    validate_text, FocusSession, LogEntry, Task, TaskCompletion, ValidationError,
};

/// Get the default database path
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = crate::config::data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Could not create {}", data_dir.display()))?;
    Ok(data_dir.join("reflex.db"))
}

/// Today's date on the host's local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self { conn };
        db.migrate()
            .with_context(|| format!("Failed to initialize database at {}", path.display()))?;
        Ok(db)
    }

    /// Open the default database
    pub fn open_default() -> Result<Self> {
        let path = default_db_path()?;
        Self::open(&path)
    }

    /// Create tables if they do not exist yet
    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0,
                date_added DATE NOT NULL DEFAULT CURRENT_DATE,
                date_completed DATE
            );

            CREATE TABLE IF NOT EXISTS focus_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                duration INTEGER NOT NULL CHECK (duration > 0),
                date DATE NOT NULL DEFAULT CURRENT_DATE,
                timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entry TEXT NOT NULL,
                date DATE NOT NULL DEFAULT CURRENT_DATE,
                timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_date_added ON tasks(date_added);
            CREATE INDEX IF NOT EXISTS idx_focus_sessions_date ON focus_sessions(date);
            CREATE INDEX IF NOT EXISTS idx_logs_date ON logs(date);
            "#,
        )?;
        Ok(())
    }

    // ==================== Tasks ====================

    /// Add a task for today, returning its id
    pub fn add_task(&self, description: &str) -> Result<i64> {
        self.add_task_on(description, today())
    }

    /// Add a task on a specific day
    pub fn add_task_on(&self, description: &str, date: NaiveDate) -> Result<i64> {
        let text = validate_text(description)?;
        self.conn.execute(
            "INSERT INTO tasks (task, completed, date_added) VALUES (?1, 0, ?2)",
            params![text, date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Mark a pending task as completed today
    pub fn complete_task(&self, id: i64) -> Result<TaskCompletion> {
        self.complete_task_on(id, today())
    }

    /// Mark a pending task as completed on a specific day
    ///
    /// Only pending tasks are touched, so a repeated completion never
    /// moves `date_completed`.
    pub fn complete_task_on(&self, id: i64, date: NaiveDate) -> Result<TaskCompletion> {
        let updated = self.conn.execute(
            "UPDATE tasks SET completed = 1, date_completed = ?1 WHERE id = ?2 AND completed = 0",
            params![date, id],
        )?;

        if updated == 1 {
            return Ok(TaskCompletion::Completed(date));
        }

        match self.get_task(id)? {
            Some(_) => Ok(TaskCompletion::AlreadyCompleted),
            None => Ok(TaskCompletion::NotFound),
        }
    }

    /// Get a task by ID
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.conn
            .query_row(
                "SELECT id, task, completed, date_added, date_completed FROM tasks WHERE id = ?1",
                params![id],
                Self::row_to_task,
            )
            .optional()
            .context("Failed to get task")
    }

    /// List tasks added on a day, in insertion order
    pub fn list_tasks(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task, completed, date_added, date_completed
             FROM tasks
             WHERE date_added = ?1
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![date], Self::row_to_task)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list tasks")
    }

    fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            task: row.get(1)?,
            completed: row.get(2)?,
            date_added: row.get(3)?,
            date_completed: row.get(4)?,
        })
    }

    // ==================== Focus Sessions ====================

    /// Record a finished focus session for today
    pub fn record_focus_session(&self, duration: u32) -> Result<i64> {
        self.record_focus_session_at(duration, now())
    }

    /// Record a focus session at a specific local time
    pub fn record_focus_session_at(&self, duration: u32, at: NaiveDateTime) -> Result<i64> {
        if duration == 0 {
            return Err(ValidationError::ZeroDuration.into());
        }

        self.conn.execute(
            "INSERT INTO focus_sessions (duration, date, timestamp) VALUES (?1, ?2, ?3)",
            params![duration, at.date(), at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List focus sessions recorded on a day, in insertion order
    pub fn list_focus_sessions(&self, date: NaiveDate) -> Result<Vec<FocusSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, duration, date, timestamp
             FROM focus_sessions
             WHERE date = ?1
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![date], |row| {
            Ok(FocusSession {
                id: row.get(0)?,
                duration: row.get(1)?,
                date: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list focus sessions")
    }

    // ==================== Logs ====================

    /// Append a work log entry for today
    pub fn add_log(&self, entry: &str) -> Result<i64> {
        self.add_log_at(entry, now())
    }

    /// Append a work log entry at a specific local time
    pub fn add_log_at(&self, entry: &str, at: NaiveDateTime) -> Result<i64> {
        let text = validate_text(entry)?;
        self.conn.execute(
            "INSERT INTO logs (entry, date, timestamp) VALUES (?1, ?2, ?3)",
            params![text, at.date(), at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List log entries for a day, in insertion order
    pub fn list_logs(&self, date: NaiveDate) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, entry, date, timestamp
             FROM logs
             WHERE date = ?1
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![date], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                entry: row.get(1)?,
                date: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list logs")
    }
}
