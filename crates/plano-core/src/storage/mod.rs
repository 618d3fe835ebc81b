//! Persistence layer
//!
//! SQLite-based storage for exercise check-offs.

use std::time::{SystemTime, UNIX_EPOCH};

mod completions;
mod database;
#[cfg(test)]
mod database_tests;

pub use completions::SqliteCompletionStore;
pub use database::Database;

/// Get current Unix timestamp in seconds
#[inline]
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
