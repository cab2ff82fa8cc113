//! Core data models for Reflex
//!
//! Tasks, focus sessions and work log entries as read back from the
//! local database. All three are grouped by calendar date only.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Longest text accepted for a task description or log entry.
pub const MAX_TEXT_LEN: usize = 1000;

/// A task added to a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Row identifier, assigned on creation
    pub id: i64,

    /// What needs doing
    pub task: String,

    /// Whether the task has been completed
    pub completed: bool,

    /// Day the task was added
    pub date_added: NaiveDate,

    /// Day the task was completed (set iff `completed`)
    pub date_completed: Option<NaiveDate>,
}

/// A recorded focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    /// Row identifier
    pub id: i64,

    /// Length of the session in whole minutes (always > 0)
    pub duration: u32,

    /// Day the session was recorded
    pub date: NaiveDate,

    /// Local time the session was recorded
    pub timestamp: NaiveDateTime,
}

/// A free-text work log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Row identifier
    pub id: i64,

    /// The logged text
    pub entry: String,

    /// Day the entry was logged
    pub date: NaiveDate,

    /// Local time the entry was logged
    pub timestamp: NaiveDateTime,
}

/// Result of trying to complete a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCompletion {
    /// The task was pending and is now completed on the given day.
    Completed(NaiveDate),
    /// The task exists but was already completed; nothing changed.
    AlreadyCompleted,
    /// No task has that id.
    NotFound,
}

/// Input rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Text was empty after trimming.
    #[error("Text cannot be empty")]
    EmptyText,

    /// Text exceeded [`MAX_TEXT_LEN`] characters.
    #[error("Text is too long ({len} characters, max {max})")]
    TextTooLong {
        /// Character count of the rejected text.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Focus sessions must last at least one minute.
    #[error("Focus session duration must be greater than zero")]
    ZeroDuration,
}

/// Trims user text and checks it is storable.
pub fn validate_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    let len = trimmed.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::TextTooLong {
            len,
            max: MAX_TEXT_LEN,
        });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text_trims() {
        assert_eq!(validate_text("  write docs \n").unwrap(), "write docs");
    }

    #[test]
    fn test_validate_text_rejects_blank() {
        assert_eq!(validate_text(""), Err(ValidationError::EmptyText));
        assert_eq!(validate_text("   \t"), Err(ValidationError::EmptyText));
    }

    #[test]
    fn test_validate_text_length_limit() {
        let exact = "a".repeat(MAX_TEXT_LEN);
        assert!(validate_text(&exact).is_ok());

        let long = "a".repeat(MAX_TEXT_LEN + 1);
        match validate_text(&long) {
            Err(ValidationError::TextTooLong { len, max }) => {
                assert_eq!(len, MAX_TEXT_LEN + 1);
                assert_eq!(max, MAX_TEXT_LEN);
            }
            other => panic!("Expected TextTooLong, got: {other:?}"),
        }
    }

    #[test]
    fn test_validate_text_counts_chars_not_bytes() {
        let accented = "é".repeat(MAX_TEXT_LEN);
        assert!(validate_text(&accented).is_ok());
    }

    #[test]
    fn test_validation_error_display() {
        assert!(ValidationError::EmptyText.to_string().contains("empty"));
        assert!(ValidationError::ZeroDuration
            .to_string()
            .contains("greater than zero"));
    }
}
