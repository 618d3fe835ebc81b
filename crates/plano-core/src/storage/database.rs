//! SQLite database wrapper with versioned migrations

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Current schema version
pub(crate) const SCHEMA_VERSION: i32 = 2;

/// SQLite database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL so a running `today` view and a `check` do not block each other
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// In-memory database, migrated and ready
    pub fn in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Get the current schema version from database
    pub(crate) fn get_schema_version(&self) -> i32 {
        if let Err(e) = self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        ) {
            tracing::warn!("Failed to create schema_version table: {}", e);
            return 0;
        }

        self.conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0)
    }

    fn set_schema_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
        Ok(())
    }

    /// Run database migrations incrementally
    pub(crate) fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version();
        info!(
            "Database schema version: {} (target: {})",
            current_version, SCHEMA_VERSION
        );

        if current_version >= SCHEMA_VERSION {
            return Ok(());
        }

        // Migration 1: Exercise check-offs
        if current_version < 1 {
            info!("Running migration 1: Exercise completions");
            self.conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS exercise_completions (
                    date TEXT NOT NULL,
                    exercise_id TEXT NOT NULL,
                    done INTEGER NOT NULL DEFAULT 0,
                    updated_at INTEGER NOT NULL,
                    PRIMARY KEY (date, exercise_id)
                );
                "#,
            )?;
            self.set_schema_version(1)?;
        }

        // Migration 2: Plan kind per check-off, date index for history queries
        if current_version < 2 {
            info!("Running migration 2: Completion kind and date index");
            self.conn.execute_batch(
                r#"
                ALTER TABLE exercise_completions ADD COLUMN plan_kind TEXT;

                CREATE INDEX IF NOT EXISTS idx_completions_date
                    ON exercise_completions(date);
                "#,
            )?;
            self.set_schema_version(2)?;
        }

        info!("Migrations complete");
        Ok(())
    }
}
