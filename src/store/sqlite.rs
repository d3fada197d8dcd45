//! SQLite-backed timestamp store.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{StoreError, TimestampStore};

/// SQLite-backed timestamp store.
///
/// A single connection behind a mutex; statements run on the blocking
/// thread pool so store calls never stall the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path`
    pub fn open(db_path: PathBuf) -> Result<Self, StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS shared_list_timestamps (
                list_id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL
            )",
            [],
        )?;

        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
            path: db_path,
        })
    }

    /// Database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Run a closure against the connection on the blocking thread pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
        .map_err(StoreError::from)
    }
}

#[async_trait]
impl TimestampStore for SqliteStore {
    async fn put(&self, list_id: &str, value: &str) -> Result<(), StoreError> {
        let list_id = list_id.to_string();
        let value = value.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO shared_list_timestamps (list_id, timestamp) VALUES (?1, ?2)
                 ON CONFLICT(list_id) DO UPDATE SET timestamp = excluded.timestamp",
                params![list_id, value],
            )
            .map(|_| ())
        })
        .await
    }

    async fn get(&self, list_id: &str) -> Result<Option<String>, StoreError> {
        let list_id = list_id.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT timestamp FROM shared_list_timestamps WHERE list_id = ?1",
                [list_id],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }
}
