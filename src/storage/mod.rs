//! Storage layer for listkeeper data.
//!
//! One SQLite database holds every guild's lists and tasks. The engine is
//! plain CRUD: each operation is a single statement (or a short fixed
//! sequence), and conflicting writers are serialized by SQLite itself.
//!
//! Referential integrity between tasks and lists is enforced at the store:
//! `tasks.list_id` carries a foreign key with `ON DELETE CASCADE`, and
//! every connection enables `PRAGMA foreign_keys`.

use crate::models::{Task, TaskList};
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage manager for the listkeeper database.
pub struct Storage {
    /// SQLite connection; held for the lifetime of one process invocation.
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path.
    ///
    /// Idempotent: safe to call on every startup. Creates the parent
    /// directory and the schema if they do not exist yet.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| {
            Error::StorageUnavailable(format!("could not open {}: {}", db_path.display(), e))
        })?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Open an in-memory database. Test and embedding convenience.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Initialize the SQLite schema.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS lists (
                id INTEGER PRIMARY KEY,
                guild_id INTEGER NOT NULL,
                channel_id INTEGER,
                message_id INTEGER,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                list_id INTEGER NOT NULL,
                priority INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                FOREIGN KEY (list_id) REFERENCES lists(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_lists_guild ON lists(guild_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_list ON tasks(list_id);
            "#,
        )?;
        Ok(())
    }

    // === List Operations ===

    /// Create a new list for a guild. Returns the generated list id.
    ///
    /// The new list starts with no channel binding.
    pub fn create_list(&self, name: &str, guild_id: i64) -> Result<i64> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("list name must not be empty".into()));
        }

        self.conn.execute(
            "INSERT INTO lists (guild_id, name) VALUES (?1, ?2)",
            params![guild_id, name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a list by id.
    pub fn get_list(&self, list_id: i64) -> Result<TaskList> {
        self.conn
            .query_row(
                "SELECT id, guild_id, name, channel_id, message_id FROM lists WHERE id = ?1",
                [list_id],
                |row| {
                    Ok(TaskList {
                        id: row.get(0)?,
                        guild_id: row.get(1)?,
                        name: row.get(2)?,
                        channel_id: row.get(3)?,
                        message_id: row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("list not found: {}", list_id)))
    }

    /// All lists owned by a guild, in creation order.
    pub fn lists_for_guild(&self, guild_id: i64) -> Result<Vec<TaskList>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, guild_id, name, channel_id, message_id
             FROM lists WHERE guild_id = ?1 ORDER BY id",
        )?;
        let lists = stmt
            .query_map([guild_id], |row| {
                Ok(TaskList {
                    id: row.get(0)?,
                    guild_id: row.get(1)?,
                    name: row.get(2)?,
                    channel_id: row.get(3)?,
                    message_id: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    /// Delete a list and, via cascade, every task belonging to it.
    pub fn delete_list(&self, list_id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM lists WHERE id = ?1", [list_id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("list not found: {}", list_id)));
        }
        Ok(())
    }

    // === Task Operations ===

    /// Create a task in a list. Returns the generated task id.
    ///
    /// Fails with `NotFound` when the list does not exist; orphaned tasks
    /// must not occur.
    pub fn create_task(
        &self,
        list_id: i64,
        name: &str,
        priority: i64,
        description: &str,
    ) -> Result<i64> {
        if !self.list_exists(list_id)? {
            return Err(Error::NotFound(format!("list not found: {}", list_id)));
        }

        self.conn.execute(
            "INSERT INTO tasks (list_id, priority, name, description) VALUES (?1, ?2, ?3, ?4)",
            params![list_id, priority, name, description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All tasks in a list, in insertion order.
    ///
    /// Returns an empty vec both for a list with no tasks and for an
    /// unknown list id; callers that need the distinction check the list
    /// with [`Storage::get_list`] first. No implicit sort by priority.
    pub fn get_tasks(&self, list_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, list_id, priority, name, description
             FROM tasks WHERE list_id = ?1 ORDER BY id",
        )?;
        let tasks = stmt
            .query_map([list_id], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    list_id: row.get(1)?,
                    priority: row.get(2)?,
                    name: row.get(3)?,
                    description: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Delete a task by id.
    pub fn delete_task(&self, task_id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", [task_id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("task not found: {}", task_id)));
        }
        Ok(())
    }

    // === Channel Binding Operations ===

    /// Overwrite the channel a list is displayed in.
    ///
    /// Touches only `channel_id`; whether the stored message id survives is
    /// the binding manager's policy, not the engine's.
    pub fn set_channel(&self, list_id: i64, channel_id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE lists SET channel_id = ?2 WHERE id = ?1",
            params![list_id, channel_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("list not found: {}", list_id)));
        }
        Ok(())
    }

    /// Record (or clear) the most recently rendered message for a list.
    pub fn set_message(&self, list_id: i64, message_id: Option<i64>) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE lists SET message_id = ?2 WHERE id = ?1",
            params![list_id, message_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("list not found: {}", list_id)));
        }
        Ok(())
    }

    /// The `(channel_id, message_id)` pair stored for a list.
    ///
    /// Returns `(None, None)` both when the list has no binding and when the
    /// list id is unknown.
    pub fn get_channel(&self, list_id: i64) -> Result<(Option<i64>, Option<i64>)> {
        let row = self
            .conn
            .query_row(
                "SELECT channel_id, message_id FROM lists WHERE id = ?1",
                [list_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row.unwrap_or((None, None)))
    }

    /// Null both `channel_id` and `message_id` in one statement.
    ///
    /// Idempotent: already-unset or unknown lists are left untouched
    /// without error.
    pub fn forget_channel(&self, list_id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE lists SET channel_id = NULL, message_id = NULL WHERE id = ?1",
            [list_id],
        )?;
        Ok(())
    }

    fn list_exists(&self, list_id: i64) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM lists WHERE id = ?1", [list_id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }
}

/// Default database location: `<data dir>/listkeeper/listkeeper.db`.
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        Error::StorageUnavailable("could not determine data directory".to_string())
    })?;
    Ok(data_dir.join("listkeeper").join("listkeeper.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(&temp_dir.path().join("listkeeper.db")).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_open_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("listkeeper.db");

        let storage = Storage::open(&db_path).unwrap();
        let id = storage.create_list("Groceries", 42).unwrap();
        drop(storage);

        // Re-opening runs schema init again and keeps existing rows.
        let storage = Storage::open(&db_path).unwrap();
        assert_eq!(storage.get_list(id).unwrap().name, "Groceries");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("dir").join("lk.db");

        Storage::open(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_create_list_returns_fresh_ids() {
        let (_temp_dir, storage) = create_test_storage();

        let a = storage.create_list("Chores", 1).unwrap();
        let b = storage.create_list("Groceries", 1).unwrap();
        assert_ne!(a, b);

        // A brand-new list has no tasks.
        assert!(storage.get_tasks(a).unwrap().is_empty());
    }

    #[test]
    fn test_create_list_rejects_empty_name() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.create_list("  ", 1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_new_list_starts_unbound() {
        let (_temp_dir, storage) = create_test_storage();

        let id = storage.create_list("Chores", 1).unwrap();
        assert_eq!(storage.get_channel(id).unwrap(), (None, None));

        let list = storage.get_list(id).unwrap();
        assert_eq!(list.channel_id, None);
        assert_eq!(list.message_id, None);
    }

    #[test]
    fn test_get_list_not_found() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.get_list(999_999).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_lists_for_guild_scoping() {
        let (_temp_dir, storage) = create_test_storage();

        let a = storage.create_list("Alpha", 10).unwrap();
        let b = storage.create_list("Beta", 10).unwrap();
        storage.create_list("Other guild", 11).unwrap();

        let lists = storage.lists_for_guild(10).unwrap();
        assert_eq!(
            lists.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![a, b]
        );
        assert!(storage.lists_for_guild(99).unwrap().is_empty());
    }

    #[test]
    fn test_task_round_trip() {
        let (_temp_dir, storage) = create_test_storage();

        let list = storage.create_list("Groceries", 42).unwrap();
        storage.create_task(list, "Milk", 1, "2%").unwrap();

        let tasks = storage.get_tasks(list).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Milk");
        assert_eq!(tasks[0].priority, 1);
        assert_eq!(tasks[0].description, "2%");
        assert_eq!(tasks[0].list_id, list);
    }

    #[test]
    fn test_get_tasks_keeps_insertion_order() {
        let (_temp_dir, storage) = create_test_storage();

        let list = storage.create_list("Chores", 1).unwrap();
        storage.create_task(list, "Low", 9, "").unwrap();
        storage.create_task(list, "High", 1, "").unwrap();
        storage.create_task(list, "Mid", 5, "").unwrap();

        // Storage order, not priority order.
        let names: Vec<_> = storage
            .get_tasks(list)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Low", "High", "Mid"]);
    }

    #[test]
    fn test_get_tasks_unknown_list_is_empty_not_error() {
        let (_temp_dir, storage) = create_test_storage();

        assert!(storage.get_tasks(999_999).unwrap().is_empty());
    }

    #[test]
    fn test_create_task_rejects_unknown_list() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.create_task(999_999, "Milk", 1, "2%").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_task() {
        let (_temp_dir, storage) = create_test_storage();

        let list = storage.create_list("Chores", 1).unwrap();
        let task = storage.create_task(list, "Sweep", 2, "").unwrap();

        storage.delete_task(task).unwrap();
        assert!(storage.get_tasks(list).unwrap().is_empty());

        let err = storage.delete_task(task).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_list_cascades_tasks() {
        let (_temp_dir, storage) = create_test_storage();

        let list = storage.create_list("Chores", 1).unwrap();
        storage.create_task(list, "Sweep", 2, "").unwrap();
        storage.create_task(list, "Mop", 3, "").unwrap();

        storage.delete_list(list).unwrap();
        assert!(matches!(
            storage.get_list(list).unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(storage.get_tasks(list).unwrap().is_empty());
    }

    #[test]
    fn test_delete_list_not_found() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.delete_list(999_999).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_set_and_get_channel() {
        let (_temp_dir, storage) = create_test_storage();

        let list = storage.create_list("Chores", 1).unwrap();
        storage.set_channel(list, 100).unwrap();
        assert_eq!(storage.get_channel(list).unwrap(), (Some(100), None));

        // Overwrites the previous channel without touching message_id.
        storage.set_message(list, Some(555)).unwrap();
        storage.set_channel(list, 200).unwrap();
        assert_eq!(storage.get_channel(list).unwrap(), (Some(200), Some(555)));
    }

    #[test]
    fn test_set_channel_unknown_list() {
        let (_temp_dir, storage) = create_test_storage();

        let err = storage.set_channel(999_999, 100).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_forget_channel_clears_both_fields() {
        let (_temp_dir, storage) = create_test_storage();

        let list = storage.create_list("Chores", 1).unwrap();
        storage.set_channel(list, 100).unwrap();
        storage.set_message(list, Some(555)).unwrap();

        storage.forget_channel(list).unwrap();
        assert_eq!(storage.get_channel(list).unwrap(), (None, None));
    }

    #[test]
    fn test_forget_channel_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();

        let list = storage.create_list("Chores", 1).unwrap();
        storage.forget_channel(list).unwrap();
        storage.forget_channel(list).unwrap();
        assert_eq!(storage.get_channel(list).unwrap(), (None, None));

        // Unknown lists are a no-op too.
        storage.forget_channel(999_999).unwrap();
    }

    #[test]
    fn test_get_channel_unknown_list_is_unbound_shape() {
        let (_temp_dir, storage) = create_test_storage();

        // No distinction between "no binding" and "unknown list".
        assert_eq!(storage.get_channel(999_999).unwrap(), (None, None));
    }
}
