//! Scoped connection providers for the record store.
//!
//! # Responsibility
//! - Hand repository code a ready connection for exactly one operation.
//! - Release the connection on every exit path, including failures.
//!
//! # Invariants
//! - Failure to open or migrate the store surfaces as `StoreUnavailable`.

use crate::db::{open_db, open_db_in_memory};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Source of record store connections.
pub trait RecordStore {
    /// Runs `op` against a migrated connection scoped to this call.
    fn with_connection<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T>;
}

/// Database file opened (and migrated if needed) on every call.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for FileStore {
    fn with_connection<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let conn = open_db(&self.path).map_err(RepoError::StoreUnavailable)?;
        op(&conn)
    }
}

/// One private in-memory database shared by every call on this value.
///
/// Calls are serialized on an internal mutex. Used for tests and throwaway
/// sessions.
pub struct MemoryStore {
    conn: Mutex<Connection>,
}

impl MemoryStore {
    pub fn open() -> RepoResult<Self> {
        let conn = open_db_in_memory().map_err(RepoError::StoreUnavailable)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl RecordStore for MemoryStore {
    fn with_connection<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        op(&conn)
    }
}
