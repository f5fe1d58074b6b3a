//! Database module for the task bot
//!
//! Provides persistence for team tasks.

mod schema;

pub use schema::*;

use chrono::Local;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

const TASK_COLUMNS: &str = "id, text, user, category, created_at";

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Apply the schema, then add the `category` column to pre-existing
    /// tables that were created before it was introduced.
    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;

        let mut stmt = conn.prepare("PRAGMA table_info(tasks)")?;
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !columns.iter().any(|c| c == "category") {
            conn.execute(
                "ALTER TABLE tasks ADD COLUMN category TEXT NOT NULL DEFAULT 'Business'",
                [],
            )?;
        }
        Ok(())
    }

    /// Create a task, returning the freshly assigned id
    ///
    /// Text is expected to be validated non-empty by the caller.
    pub fn create_task(&self, text: &str, owner: i64, category: Category) -> DbResult<i64> {
        let conn = self.conn.lock().unwrap();
        let created_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        conn.execute(
            "INSERT INTO tasks (text, user, category, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![text, owner, category.as_str(), created_at],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Delete a task, but only if it belongs to `owner`
    ///
    /// Returns whether a row was deleted. "Not found" and "owned by someone
    /// else" are both normal `false` outcomes, not errors.
    pub fn delete_task(&self, task_id: i64, owner: i64) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user = ?2",
            params![task_id, owner],
        )?;
        Ok(deleted > 0)
    }

    /// List tasks in creation order, optionally restricted to one owner
    pub fn list_tasks(&self, owner: Option<i64>) -> DbResult<Vec<Task>> {
        let conn = self.conn.lock().unwrap();

        if let Some(owner) = owner {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![owner], task_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
        } else {
            let mut stmt =
                conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))?;
            let rows = stmt.query_map([], task_from_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
        }
    }

    /// List all tasks of one category, in creation order
    pub fn list_tasks_by_category(&self, category: Category) -> DbResult<Vec<Task>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE category = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![category.as_str()], task_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Point lookup by id
    pub fn get_task(&self, task_id: i64) -> DbResult<Option<Task>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"
        ))?;

        let mut rows = stmt.query_map(params![task_id], task_from_row)?;
        match rows.next() {
            Some(task) => Ok(Some(task?)),
            None => Ok(None),
        }
    }
}

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        text: row.get(1)?,
        owner: row.get(2)?,
        category: parse_category(&row.get::<_, String>(3)?),
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_task() {
        let db = Database::open_in_memory().unwrap();

        let id = db.create_task("Write spec", 100, Category::Backend).unwrap();

        let task = db.get_task(id).unwrap().unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.text, "Write spec");
        assert_eq!(task.owner, 100);
        assert_eq!(task.category, Category::Backend);
        assert!(!task.created_at.is_empty());
    }

    #[test]
    fn test_ids_are_fresh_and_monotonic() {
        let db = Database::open_in_memory().unwrap();

        let first = db.create_task("one", 1, Category::Business).unwrap();
        let second = db.create_task("two", 1, Category::Business).unwrap();
        assert!(second > first);

        // A deleted id is not a lookup hit afterwards
        assert!(db.delete_task(first, 1).unwrap());
        assert!(db.get_task(first).unwrap().is_none());
    }

    #[test]
    fn test_delete_requires_ownership() {
        let db = Database::open_in_memory().unwrap();

        let id = db.create_task("theirs", 42, Category::Frontend).unwrap();

        // Wrong owner: nothing deleted, task still there
        assert!(!db.delete_task(id, 7).unwrap());
        assert!(db.get_task(id).unwrap().is_some());

        // Right owner: deleted once, then a normal false outcome
        assert!(db.delete_task(id, 42).unwrap());
        assert!(!db.delete_task(id, 42).unwrap());
    }

    #[test]
    fn test_delete_missing_task_is_not_an_error() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.delete_task(9999, 1).unwrap());
    }

    #[test]
    fn test_list_tasks_filters_by_owner() {
        let db = Database::open_in_memory().unwrap();

        db.create_task("a", 1, Category::Business).unwrap();
        db.create_task("b", 2, Category::Business).unwrap();
        db.create_task("c", 1, Category::Business).unwrap();

        let all = db.list_tasks(None).unwrap();
        assert_eq!(all.len(), 3);

        let mine = db.list_tasks(Some(1)).unwrap();
        assert_eq!(mine.len(), 2);

        // Restricted list is exactly the owner's subset of the full list
        let expected: Vec<_> = all.into_iter().filter(|t| t.owner == 1).collect();
        assert_eq!(mine, expected);
    }

    #[test]
    fn test_list_tasks_ascending_id_order() {
        let db = Database::open_in_memory().unwrap();

        for text in ["first", "second", "third"] {
            db.create_task(text, 5, Category::DataBase).unwrap();
        }

        let tasks = db.list_tasks(None).unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_list_tasks_by_category() {
        let db = Database::open_in_memory().unwrap();

        db.create_task("db work", 1, Category::DataBase).unwrap();
        db.create_task("ui work", 2, Category::Frontend).unwrap();
        db.create_task("more db", 3, Category::DataBase).unwrap();

        let db_tasks = db.list_tasks_by_category(Category::DataBase).unwrap();
        assert_eq!(db_tasks.len(), 2);
        assert!(db_tasks.iter().all(|t| t.category == Category::DataBase));

        let business = db.list_tasks_by_category(Category::Business).unwrap();
        assert!(business.is_empty());
    }

    #[test]
    fn test_category_migration_on_existing_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        // Simulate a database created before the category column existed
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT NOT NULL,
                    user INTEGER NOT NULL,
                    created_at TEXT NOT NULL
                );
                INSERT INTO tasks (text, user, created_at)
                VALUES ('old task', 9, '2024-01-01 00:00:00');",
            )
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let tasks = db.list_tasks(None).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].category, Category::Business);

        // Reopening must not attempt the ALTER again
        drop(db);
        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_tasks(None).unwrap().len(), 1);
    }
}
