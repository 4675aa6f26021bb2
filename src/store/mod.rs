use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::Task;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(i64),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Durable single-table task persistence with autoincrement identity.
pub struct TaskStore {
    conn: Connection,
}

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS tasks (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  text TEXT NOT NULL,
  completed INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

impl TaskStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// Idempotent; an error here means the process cannot serve requests.
    pub fn open(path: impl AsRef<Path>) -> Result<TaskStore, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<TaskStore, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<TaskStore, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(TaskStore { conn })
    }

    /// All tasks, newest first. Id breaks ties between equal timestamps so
    /// the order stays stable for rapid inserts.
    pub fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, completed, created_at FROM tasks
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Insert a task with the given text, returning the stored row with its
    /// generated id. `created_at` is written explicitly (RFC 3339, UTC) so
    /// ordering has sub-second resolution.
    pub fn insert(&self, text: &str) -> Result<Task, StoreError> {
        self.conn.execute(
            "INSERT INTO tasks (text, created_at) VALUES (?1, ?2)",
            params![text, Utc::now()],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get(id)
    }

    pub fn get(&self, id: i64) -> Result<Task, StoreError> {
        self.conn
            .query_row(
                "SELECT id, text, completed, created_at FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    /// Update a task's text, returning the refreshed row. Zero rows affected
    /// means the id does not exist.
    pub fn update_text(&self, id: i64, text: &str) -> Result<Task, StoreError> {
        let changed = self
            .conn
            .execute("UPDATE tasks SET text = ?1 WHERE id = ?2", params![text, id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        self.get(id)
    }

    /// Update a task's completed flag, returning the refreshed row.
    pub fn update_completed(&self, id: i64, value: bool) -> Result<Task, StoreError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?1 WHERE id = ?2",
            params![value, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        text: row.get(1)?,
        completed: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> TaskStore {
        TaskStore::open_in_memory().unwrap()
    }

    #[test]
    fn insert_assigns_id_and_defaults() {
        let store = store();
        let task = store.insert("Buy milk").unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert!(task.id > 0);
    }

    #[test]
    fn list_is_newest_first() {
        let store = store();
        let a = store.insert("a").unwrap();
        let b = store.insert("b").unwrap();
        let list = store.list_all().unwrap();
        assert_eq!(
            list.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![b.id, a.id]
        );
    }

    #[test]
    fn update_text_leaves_other_fields_alone() {
        let store = store();
        let task = store.insert("before").unwrap();
        let updated = store.update_text(task.id, "after").unwrap();
        assert_eq!(updated.text, "after");
        assert_eq!(updated.completed, task.completed);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn update_text_unknown_id_is_not_found() {
        let store = store();
        assert!(matches!(
            store.update_text(42, "x"),
            Err(StoreError::NotFound(42))
        ));
    }

    #[test]
    fn update_completed_round_trips() {
        let store = store();
        let task = store.insert("t").unwrap();
        let on = store.update_completed(task.id, true).unwrap();
        assert!(on.completed);
        let off = store.update_completed(task.id, false).unwrap();
        assert!(!off.completed);
    }

    #[test]
    fn delete_removes_row() {
        let store = store();
        let task = store.insert("t").unwrap();
        store.delete(task.id).unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert!(matches!(store.delete(task.id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn open_is_idempotent_on_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        {
            let store = TaskStore::open(&path).unwrap();
            store.insert("persisted").unwrap();
        }
        let store = TaskStore::open(&path).unwrap();
        let list = store.list_all().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].text, "persisted");
    }
}
