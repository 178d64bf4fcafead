//! In-process storage backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{DurableStorage, StorageError, StorageOp, apply_ops};

/// Storage backed by a shared map.
///
/// Clones share the same map, so a clone handed to a second session store
/// behaves like the same browser profile after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        apply_ops(&mut entries, ops);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("token", "tok-abc").unwrap();
        assert_eq!(other.get("token").unwrap().as_deref(), Some("tok-abc"));

        other.remove("token").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_batch_applies_in_order() {
        let storage = MemoryStorage::new();
        storage
            .apply(&[
                StorageOp::set("a", "1"),
                StorageOp::set("b", "2"),
                StorageOp::remove("a"),
            ])
            .unwrap();

        assert_eq!(storage.get("a").unwrap(), None);
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_clear_removes_every_key() {
        let storage = MemoryStorage::new();
        storage.set("token", "tok-abc").unwrap();
        storage.set("theme", "dark").unwrap();

        storage.clear().unwrap();
        assert!(storage.is_empty());
    }
}
