//! Error types for the storage layer.

use rusqlite::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
///
/// A missing record is not an error; see [`crate::StateStore::load_into`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite, tagged with the operation that failed.
    #[error("failed to {op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation did not complete before its deadline and was rolled back.
    #[error("operation timed out after {0:?}; nothing was written")]
    Timeout(Duration),

    /// The blocking worker running the statement panicked or was aborted.
    #[error("storage task failed: {0}")]
    Task(String),
}

impl StorageError {
    pub(crate) fn db(op: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Database { op, source }
    }

    /// True for failures caused by another writer holding the lock or by an
    /// interrupt, as opposed to a genuine database fault.
    pub(crate) fn is_contention(&self) -> bool {
        match self {
            Self::Database { source, .. } => matches!(
                source.sqlite_error_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::OperationInterrupted)
            ),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn sqlite(code: i32) -> StorageError {
        StorageError::Database {
            op: "save state",
            source: rusqlite::Error::SqliteFailure(ffi::Error::new(code), None),
        }
    }

    #[test]
    fn busy_and_interrupt_are_contention() {
        assert!(sqlite(ffi::SQLITE_BUSY).is_contention());
        assert!(sqlite(ffi::SQLITE_LOCKED).is_contention());
        assert!(sqlite(ffi::SQLITE_INTERRUPT).is_contention());
        assert!(StorageError::Timeout(Duration::from_millis(5)).is_contention());
    }

    #[test]
    fn genuine_faults_are_not_contention() {
        assert!(!sqlite(ffi::SQLITE_CORRUPT).is_contention());
        assert!(!sqlite(ffi::SQLITE_READONLY).is_contention());
        assert!(!StorageError::Io(std::io::Error::other("disk gone")).is_contention());
        assert!(!StorageError::Task("panicked".into()).is_contention());
    }
}
