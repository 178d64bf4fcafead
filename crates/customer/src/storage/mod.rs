//! Durable key/value storage.
//!
//! A string-keyed, string-valued store that outlives a single run of the
//! client. The session store is the only writer; it changes its keys in one
//! [`DurableStorage::apply`] batch so the backing file never holds half a
//! session.
//!
//! # Implementations
//!
//! - [`FileStorage`] - JSON object file replaced atomically on every write
//! - [`MemoryStorage`] - shared in-process map for tests and ephemeral use

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("Storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the in-memory map.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A single change within a storage batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StorageOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }
}

/// String key/value storage that survives a restart.
///
/// Methods take `&self`: the store is a process-wide shared resource and
/// implementations handle their own interior mutability.
pub trait DurableStorage {
    /// Read a value; `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Apply a batch of changes.
    ///
    /// Backends that can should make the whole batch visible at once.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError>;

    /// Remove every key without reading the current contents.
    ///
    /// Succeeds even when the existing data cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn clear(&self) -> Result<(), StorageError>;

    /// Store a single value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.apply(&[StorageOp::set(key, value)])
    }

    /// Remove a single value. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.apply(&[StorageOp::remove(key)])
    }
}

/// Apply a batch to an in-memory map.
fn apply_ops(map: &mut std::collections::BTreeMap<String, String>, ops: &[StorageOp]) {
    for op in ops {
        match op {
            StorageOp::Set { key, value } => {
                map.insert(key.clone(), value.clone());
            }
            StorageOp::Remove { key } => {
                map.remove(key);
            }
        }
    }
}
