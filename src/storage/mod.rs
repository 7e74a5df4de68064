//! Key-value persistence port.
//!
//! The store and the identity service persist whole values under logical
//! keys, mirroring a browser's local storage: every write replaces the full
//! value, absent keys fall back to documented defaults, and the last writer
//! wins. There are no transactions spanning keys and no schema migrations.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Logical key names. The todo/preference keys match the original
/// collection's stored names so existing data remains readable.
pub mod keys {
    pub const TODOS: &str = "todos";
    pub const SORT_TYPE: &str = "sortType";
    pub const FILTER_TYPE: &str = "filterType";
    pub const FILTER_ASSIGNEE_ID: &str = "filterAssigneeId";
    pub const FILTER_START_DATE: &str = "filterStartDate";
    pub const FILTER_END_DATE: &str = "filterEndDate";
    pub const USERS: &str = "users";
    pub const SESSION: &str = "session";
}

/// Storage backend: read/write/delete a serialized value by key.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Read and deserialize a JSON value. Absent key yields `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>> {
    match storage.read(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| Error::CorruptValue {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value under a key.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|source| Error::CorruptValue {
        key: key.to_string(),
        source,
    })?;
    storage.write(key, &raw)
}
