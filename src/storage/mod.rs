//! Storage layer for sg
//!
//! SQLite holds the skill catalog and the prerequisite edge set. Schema
//! changes go through numbered migrations tracked in `PRAGMA user_version`.

pub mod migrations;
pub mod sqlite;

pub use sqlite::Database;
