//! SQLite-backed exercise completion store

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{database::Database, unix_timestamp};
use crate::error::Result;
use crate::plan::{CompletionStore, ExerciseId, PlanKind};

/// Check-offs persisted in `exercise_completions`
pub struct SqliteCompletionStore {
    db: Database,
    kind: Option<PlanKind>,
}

impl SqliteCompletionStore {
    pub fn new(db: Database) -> Self {
        Self { db, kind: None }
    }

    /// Tag new check-offs with the plan kind they came from
    pub fn for_kind(db: Database, kind: PlanKind) -> Self {
        Self {
            db,
            kind: Some(kind),
        }
    }

    /// Ids marked done on `date`, sorted
    pub fn completed_on(&self, date: NaiveDate) -> Result<Vec<ExerciseId>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT exercise_id FROM exercise_completions
             WHERE date = ?1 AND done = 1
             ORDER BY exercise_id",
        )?;
        let ids = stmt
            .query_map([date.to_string()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids.iter().map(|id| ExerciseId::from(id.as_str())).collect())
    }

    /// Forget every check-off of `date`
    pub fn clear_day(&self, date: NaiveDate) -> Result<usize> {
        let removed = self.db.conn().execute(
            "DELETE FROM exercise_completions WHERE date = ?1",
            [date.to_string()],
        )?;
        Ok(removed)
    }
}

impl CompletionStore for SqliteCompletionStore {
    fn get(&self, date: NaiveDate, id: &ExerciseId) -> Result<bool> {
        let done: Option<bool> = self
            .db
            .conn()
            .query_row(
                "SELECT done FROM exercise_completions WHERE date = ?1 AND exercise_id = ?2",
                params![date.to_string(), id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(done.unwrap_or(false))
    }

    fn set(&mut self, date: NaiveDate, id: &ExerciseId, done: bool) -> Result<()> {
        self.db.conn().execute(
            "INSERT INTO exercise_completions (date, exercise_id, done, updated_at, plan_kind)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(date, exercise_id) DO UPDATE SET done = ?3, updated_at = ?4, plan_kind = ?5",
            params![
                date.to_string(),
                id.as_str(),
                done,
                unix_timestamp() as i64,
                self.kind.map(|k| k.as_str()),
            ],
        )?;
        Ok(())
    }
}
