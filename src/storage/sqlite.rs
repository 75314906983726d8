use super::{PersistedLists, StorageService, BLACK_LIST_KEY, WHITE_LIST_KEY};
use crate::error::StorageError;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// SQLite-backed key-value store.
///
/// Every namespace holds at most the `whiteList` and `blackList` keys, each a
/// JSON array of domains. Saving clears the namespace and rewrites it in one
/// transaction.
pub struct SqliteStorage {
    namespace: String,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        let storage = Self::with_connection(conn, namespace)?;
        info!("SQLite list storage initialized at {}", path.display());
        Ok(storage)
    }

    pub fn open_in_memory(namespace: impl Into<String>) -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?, namespace)
    }

    fn with_connection(conn: Connection, namespace: impl Into<String>) -> Result<Self, StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            )",
            [],
        )?;

        Ok(Self {
            namespace: namespace.into(),
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn read_lists(conn: &Connection, namespace: &str) -> Result<PersistedLists, StorageError> {
    let mut stmt = conn.prepare_cached("SELECT key, value FROM kv_store WHERE namespace = ?1")?;
    let rows = stmt.query_map(params![namespace], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut lists = PersistedLists::default();
    for row in rows {
        let (key, value) = row?;
        match key.as_str() {
            WHITE_LIST_KEY => lists.white_list = Some(serde_json::from_str(&value)?),
            BLACK_LIST_KEY => lists.black_list = Some(serde_json::from_str(&value)?),
            _ => {}
        }
    }
    Ok(lists)
}

fn write_lists(conn: &mut Connection, namespace: &str, lists: &PersistedLists) -> Result<(), StorageError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM kv_store WHERE namespace = ?1", params![namespace])?;

    for (key, list) in [(WHITE_LIST_KEY, &lists.white_list), (BLACK_LIST_KEY, &lists.black_list)] {
        if let Some(list) = list {
            tx.execute(
                "INSERT INTO kv_store (namespace, key, value) VALUES (?1, ?2, ?3)",
                params![namespace, key, serde_json::to_string(list)?],
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}

#[async_trait]
impl StorageService for SqliteStorage {
    async fn load_all(&self) -> Result<PersistedLists, StorageError> {
        let conn = self.conn.clone();
        let namespace = self.namespace.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StorageError::Poisoned)?;
            read_lists(&conn, &namespace)
        })
        .await?
    }

    async fn save_all(&self, lists: &PersistedLists) -> Result<(), StorageError> {
        let conn = self.conn.clone();
        let namespace = self.namespace.clone();
        let lists = lists.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|_| StorageError::Poisoned)?;
            write_lists(&mut conn, &namespace, &lists)
        })
        .await?
    }
}
