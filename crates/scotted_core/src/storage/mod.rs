//! Durable key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Define the string key/value contract preferences are persisted through.
//! - Keep SQLite details behind the storage boundary.
//!
//! # Invariants
//! - Values are opaque strings; encoding belongs to the caller.
//! - Failures are reported, never swallowed here. Swallowing is a caller
//!   policy.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_storage;
pub mod sqlite_storage;

pub use memory_storage::MemoryKeyValueStorage;
pub use sqlite_storage::SqliteKeyValueStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by a durable storage backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend is disabled or unreachable (private mode, revoked quota).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistent string key/value store scoped to one origin.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}
