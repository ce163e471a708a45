//! SQLite storage layer for VJAL.
//!
//! Provides a durable `(namespace, key) → JSON` store for application state
//! such as in-progress form pages.
//!
//! # Architecture
//!
//! - One table, `state`, with a composite primary key
//! - Writes are single `INSERT … ON CONFLICT DO UPDATE` statements, so each
//!   record is replaced atomically and repeated saves are idempotent
//! - Each operation opens its own connection; concurrent writers are
//!   serialized by SQLite itself (WAL journal + busy timeout)
//! - Async helpers bound an operation by a deadline and interrupt the
//!   statement when it expires
//! - Save and load calls are counted through the `metrics` facade

mod backend;
mod error;
mod state_store;
pub mod telemetry;

pub use backend::StoreBackend;
pub use error::{StorageError, StorageResult};
pub use state_store::{StateStore, BUSY_TIMEOUT};
pub use telemetry::describe_metrics;
