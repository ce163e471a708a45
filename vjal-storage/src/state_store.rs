//! Namespaced key-value state backed by SQLite.

use crate::backend::StoreBackend;
use crate::error::{StorageError, StorageResult};
use crate::telemetry;
use metrics::counter;
use rusqlite::{params, Connection, InterruptHandle, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use vjal_config::AppConfig;

/// How long a connection waits on another writer before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Busy-wait slice for deadline-bounded operations, between cancel checks.
const BUSY_SLICE: Duration = Duration::from_millis(50);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS state (
        namespace TEXT NOT NULL,
        item_key  TEXT NOT NULL,
        data      TEXT NOT NULL,
        PRIMARY KEY (namespace, item_key)
    );
";

const UPSERT: &str = "
    INSERT INTO state (namespace, item_key, data)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(namespace, item_key) DO UPDATE SET data = excluded.data
";

const SELECT: &str = "SELECT data FROM state WHERE namespace = ?1 AND item_key = ?2";

/// Durable `(namespace, key) → JSON` store.
///
/// Records are created on first save, overwritten on later saves and never
/// deleted implicitly. The store is `Send + Sync`; share it behind an `Arc`.
pub struct StateStore {
    path: PathBuf,
    // Keeps a temporary backend's directory alive for the store's lifetime.
    _temp_dir: Option<TempDir>,
}

impl StateStore {
    /// Opens (or creates) a store on the given backend and ensures the
    /// schema exists.
    pub fn open(backend: StoreBackend) -> StorageResult<Self> {
        let (path, temp_dir) = match backend {
            StoreBackend::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                (path, None)
            }
            StoreBackend::Temporary => {
                let dir = tempfile::Builder::new().prefix("vjal-state-").tempdir()?;
                (dir.path().join("state.db"), Some(dir))
            }
        };

        let store = Self {
            path,
            _temp_dir: temp_dir,
        };
        store.init_schema()?;
        info!(path = %store.path.display(), "state store opened");
        Ok(store)
    }

    /// Opens (or creates) a store at the given file path.
    pub fn open_path(path: impl Into<PathBuf>) -> StorageResult<Self> {
        Self::open(StoreBackend::File(path.into()))
    }

    /// Opens a private throwaway store (for testing).
    pub fn open_temporary() -> StorageResult<Self> {
        Self::open(StoreBackend::Temporary)
    }

    /// Opens the store the configuration points at.
    pub fn from_config(config: &AppConfig) -> StorageResult<Self> {
        Self::open(StoreBackend::from(config))
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.connect()?;
        let journal: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(StorageError::db("enable WAL journal"))?;
        debug!(journal = %journal, "journal mode set");
        conn.execute_batch(SCHEMA)
            .map_err(StorageError::db("create state table"))?;
        Ok(())
    }

    fn connect(&self) -> StorageResult<Connection> {
        let conn = Connection::open(&self.path).map_err(StorageError::db("open state store"))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(StorageError::db("configure busy timeout"))?;
        Ok(conn)
    }

    // ── Synchronous API ──────────────────────────────────────────

    /// Serializes `value` to JSON and stores it under `(namespace, key)`,
    /// replacing any existing record.
    #[instrument(skip(self, value))]
    pub fn save<T: Serialize + ?Sized>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
    ) -> StorageResult<()> {
        counter!(telemetry::STATE_SAVE_TOTAL).increment(1);
        let data = serde_json::to_string(value)?;
        let conn = self.connect()?;
        upsert(&conn, namespace, key, &data)
    }

    /// Loads the record under `(namespace, key)`, if any.
    #[instrument(skip(self))]
    pub fn load<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> StorageResult<Option<T>> {
        counter!(telemetry::STATE_LOAD_TOTAL).increment(1);
        let conn = self.connect()?;
        decode(select(&conn, namespace, key)?)
    }

    /// Deserializes the record under `(namespace, key)` into `dest`.
    ///
    /// A missing record is a soft miss: `dest` is left untouched and
    /// `Ok(())` is returned. On a decode error `dest` is also untouched.
    pub fn load_into<T: DeserializeOwned>(
        &self,
        namespace: &str,
        key: &str,
        dest: &mut T,
    ) -> StorageResult<()> {
        if let Some(value) = self.load(namespace, key)? {
            *dest = value;
        }
        Ok(())
    }

    /// Returns true if a record exists under `(namespace, key)`.
    pub fn contains(&self, namespace: &str, key: &str) -> StorageResult<bool> {
        let conn = self.connect()?;
        Ok(select(&conn, namespace, key)?.is_some())
    }

    /// Returns the total number of records.
    pub fn len(&self) -> StorageResult<usize> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM state", [], |row| row.get(0))
            .map_err(StorageError::db("count state records"))?;
        Ok(count as usize)
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    // ── Deadline-bounded API ─────────────────────────────────────

    /// Like [`StateStore::save`], but gives up after `timeout`.
    ///
    /// The statement runs on tokio's blocking pool and waits on other
    /// writers in short slices until the deadline. When the deadline passes
    /// a running statement is interrupted, which rolls the upsert back; a
    /// write that committed first is reported as success.
    pub async fn save_with_timeout<T: Serialize + ?Sized>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
        timeout: Duration,
    ) -> StorageResult<()> {
        counter!(telemetry::STATE_SAVE_TOTAL).increment(1);
        let data = serde_json::to_string(value)?;
        let conn = self.connect()?;
        let (namespace, key) = (namespace.to_owned(), key.to_owned());
        run_with_deadline(conn, timeout, move |conn| {
            upsert(conn, &namespace, &key, &data)
        })
        .await
    }

    /// Like [`StateStore::load`], but gives up after `timeout`.
    pub async fn load_with_timeout<T: DeserializeOwned>(
        &self,
        namespace: &str,
        key: &str,
        timeout: Duration,
    ) -> StorageResult<Option<T>> {
        counter!(telemetry::STATE_LOAD_TOTAL).increment(1);
        let conn = self.connect()?;
        let (namespace, key) = (namespace.to_owned(), key.to_owned());
        let data = run_with_deadline(conn, timeout, move |conn| {
            select(conn, &namespace, &key)
        })
        .await?;
        decode(data)
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("path", &self.path)
            .field("temporary", &self._temp_dir.is_some())
            .finish()
    }
}

fn upsert(conn: &Connection, namespace: &str, key: &str, data: &str) -> StorageResult<()> {
    conn.execute(UPSERT, params![namespace, key, data])
        .map_err(StorageError::db("save state"))?;
    debug!(namespace, key, bytes = data.len(), "state saved");
    Ok(())
}

fn select(conn: &Connection, namespace: &str, key: &str) -> StorageResult<Option<String>> {
    conn.query_row(SELECT, params![namespace, key], |row| row.get(0))
        .optional()
        .map_err(StorageError::db("query state"))
}

fn decode<T: DeserializeOwned>(data: Option<String>) -> StorageResult<Option<T>> {
    data.map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(Into::into)
}

/// Runs `op` on a blocking worker, abandoning it once `timeout` passes.
///
/// The connection waits on other writers in short slices so the cancel flag
/// is seen promptly; a statement already running is interrupted instead.
async fn run_with_deadline<R, F>(conn: Connection, timeout: Duration, op: F) -> StorageResult<R>
where
    R: Send + 'static,
    F: Fn(&Connection) -> StorageResult<R> + Send + 'static,
{
    conn.busy_timeout(BUSY_SLICE)
        .map_err(StorageError::db("configure busy timeout"))?;
    let interrupt: InterruptHandle = conn.get_interrupt_handle();
    let cancelled = Arc::new(AtomicBool::new(false));

    let flag = cancelled.clone();
    let mut task: JoinHandle<StorageResult<R>> = tokio::task::spawn_blocking(move || {
        loop {
            if flag.load(Ordering::SeqCst) {
                return Err(StorageError::Timeout(timeout));
            }
            match op(&conn) {
                Err(err) if err.is_contention() && !flag.load(Ordering::SeqCst) => continue,
                other => return other,
            }
        }
    });

    match tokio::time::timeout(timeout, &mut task).await {
        Ok(joined) => joined.map_err(|e| StorageError::Task(e.to_string()))?,
        Err(_) => {
            cancelled.store(true, Ordering::SeqCst);
            interrupt.interrupt();
            let result = task.await.map_err(|e| StorageError::Task(e.to_string()))?;
            settle_after_deadline(result, timeout)
        }
    }
}

/// Maps the outcome of an operation abandoned at its deadline. A commit that
/// won the race stands; contention becomes `Timeout`; other faults pass through.
fn settle_after_deadline<R>(result: StorageResult<R>, timeout: Duration) -> StorageResult<R> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_contention() => {
            warn!(?timeout, error = %err, "state operation abandoned at deadline");
            Err(StorageError::Timeout(timeout))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEADLINE: Duration = Duration::from_millis(100);

    fn busy() -> StorageError {
        StorageError::Database {
            op: "save state",
            source: rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
                None,
            ),
        }
    }

    #[test]
    fn commit_before_deadline_stands() {
        assert_eq!(settle_after_deadline(Ok(7), DEADLINE).unwrap(), 7);
    }

    #[test]
    fn contention_at_deadline_is_timeout() {
        let result: StorageResult<()> = settle_after_deadline(Err(busy()), DEADLINE);
        assert!(matches!(result, Err(StorageError::Timeout(d)) if d == DEADLINE));
    }

    #[test]
    fn genuine_fault_at_deadline_passes_through() {
        let fault = StorageError::Io(std::io::Error::other("disk full"));
        let result: StorageResult<()> = settle_after_deadline(Err(fault), DEADLINE);
        assert!(matches!(result, Err(StorageError::Io(_))));

        let bad_json = serde_json::from_str::<u32>("nope").unwrap_err();
        let result: StorageResult<()> = settle_after_deadline(Err(bad_json.into()), DEADLINE);
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
