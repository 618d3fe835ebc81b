//! Tests for database migrations and the completion store

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::plan::{CompletionStore, ExerciseId, PlanKind};
    use crate::storage::database::{Database, SCHEMA_VERSION};
    use crate::storage::SqliteCompletionStore;

    /// Helper to create a temporary database for testing
    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("test.db");
        let db = Database::new(&db_path).expect("Failed to create database");
        (db, temp_dir)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date")
    }

    #[test]
    fn test_database_creation() {
        let (db, _temp) = create_test_db();
        assert_eq!(db.get_schema_version(), SCHEMA_VERSION);
    }

    #[test]
    fn test_completions_table_columns() {
        let (db, _temp) = create_test_db();

        let mut stmt = db
            .conn()
            .prepare("PRAGMA table_info(exercise_completions)")
            .expect("Failed to prepare PRAGMA");
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("Failed to get columns")
            .filter_map(Result::ok)
            .collect();

        for column in ["date", "exercise_id", "done", "updated_at", "plan_kind"] {
            assert!(columns.contains(&column.to_string()), "missing {column}");
        }
    }

    #[test]
    fn test_wal_mode_enabled() {
        let (db, _temp) = create_test_db();

        let journal_mode: String = db
            .conn()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .expect("Failed to get journal_mode");

        assert_eq!(journal_mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_migrations_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let db = Database::new(&db_path).expect("first open");
        drop(db);
        let db = Database::new(&db_path).expect("second open");
        assert_eq!(db.get_schema_version(), SCHEMA_VERSION);

        let rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .expect("count versions");
        assert_eq!(rows, SCHEMA_VERSION as i64);
    }

    #[test]
    fn test_completion_round_trip() {
        let (db, _temp) = create_test_db();
        let mut store = SqliteCompletionStore::for_kind(db, PlanKind::Workout);
        let id = ExerciseId::from("supino-reto-0");

        assert!(!store.get(date(3), &id).expect("get"));
        store.set(date(3), &id, true).expect("set");
        assert!(store.get(date(3), &id).expect("get"));
        assert!(!store.get(date(4), &id).expect("get other day"));

        store.set(date(3), &id, false).expect("unset");
        assert!(!store.get(date(3), &id).expect("get"));
    }

    #[test]
    fn test_completed_on_and_clear() {
        let db = Database::in_memory().expect("in-memory db");
        let mut store = SqliteCompletionStore::new(db);
        store.set(date(5), &ExerciseId::from("b-1"), true).expect("set");
        store.set(date(5), &ExerciseId::from("a-0"), true).expect("set");
        store.set(date(5), &ExerciseId::from("c-2"), false).expect("set");

        let done = store.completed_on(date(5)).expect("list");
        assert_eq!(done, vec![ExerciseId::from("a-0"), ExerciseId::from("b-1")]);

        assert_eq!(store.clear_day(date(5)).expect("clear"), 3);
        assert!(store.completed_on(date(5)).expect("list").is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let id = ExerciseId::from("ponte-de-gluteo-0");

        {
            let mut store = SqliteCompletionStore::new(Database::new(&db_path).expect("open"));
            store.set(date(10), &id, true).expect("set");
        }

        let store = SqliteCompletionStore::new(Database::new(&db_path).expect("reopen"));
        assert!(store.get(date(10), &id).expect("get"));
    }
}
