//! Exercise completion tracking
//!
//! Check-offs are keyed by `(date, ExerciseId)` and live behind the
//! [`CompletionStore`] trait so the resolver stays pure. An in-memory store
//! is provided here; the SQLite one lives in [`crate::storage`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schedule::{ExerciseId, ScheduledExercise};
use crate::error::Result;

pub trait CompletionStore {
    /// Whether the exercise was marked done on `date`. Unknown ids are not done.
    fn get(&self, date: NaiveDate, id: &ExerciseId) -> Result<bool>;

    fn set(&mut self, date: NaiveDate, id: &ExerciseId, done: bool) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryCompletionStore {
    done: BTreeMap<(NaiveDate, ExerciseId), bool>,
}

impl MemoryCompletionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionStore for MemoryCompletionStore {
    fn get(&self, date: NaiveDate, id: &ExerciseId) -> Result<bool> {
        Ok(self.done.get(&(date, id.clone())).copied().unwrap_or(false))
    }

    fn set(&mut self, date: NaiveDate, id: &ExerciseId, done: bool) -> Result<()> {
        self.done.insert((date, id.clone()), done);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub done: usize,
    pub total: usize,
}

impl DayProgress {
    /// A day with nothing scheduled counts as complete.
    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

/// Count the day's exercises marked done.
pub fn day_progress<S>(date: NaiveDate, exercises: &[ScheduledExercise], store: &S) -> Result<DayProgress>
where
    S: CompletionStore + ?Sized,
{
    let mut done = 0;
    for exercise in exercises {
        if store.get(date, &exercise.id)? {
            done += 1;
        }
    }
    Ok(DayProgress {
        done,
        total: exercises.len(),
    })
}
