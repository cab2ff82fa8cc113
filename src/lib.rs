//! Reflex - a terminal productivity tracker
//!
//! Reflex records tasks, focus sessions and work log entries in a local
//! SQLite database, summarizes each day, and produces daily reviews with
//! an AI provider or a built-in rule-based fallback.

pub mod config;
pub mod focus;
pub mod github;
pub mod review;
pub mod stats;
pub mod storage;
