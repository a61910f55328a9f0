//! In-memory storage with a switchable availability flag.

use super::{KeyValueStorage, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Process-local storage, also used to model disabled browser storage.
#[derive(Debug)]
pub struct MemoryKeyValueStorage {
    items: RefCell<BTreeMap<String, String>>,
    available: Cell<bool>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self {
            items: RefCell::new(BTreeMap::new()),
            available: Cell::new(true),
        }
    }

    /// Storage that rejects every read and write.
    pub fn unavailable() -> Self {
        let storage = Self::new();
        storage.set_available(false);
        storage
    }

    /// Toggles availability; contents survive an outage.
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StorageError::Unavailable(
                "memory storage is switched off".to_string(),
            ))
        }
    }
}

impl Default for MemoryKeyValueStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStorage;
    use crate::storage::{KeyValueStorage, StorageError};

    #[test]
    fn set_get_remove() {
        let storage = MemoryKeyValueStorage::new();
        storage.set_item("a", "1").expect("set should succeed");
        assert_eq!(storage.get_item("a").expect("get").as_deref(), Some("1"));

        storage.remove_item("a").expect("remove should succeed");
        assert_eq!(storage.get_item("a").expect("get"), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn unavailable_storage_rejects_access_but_keeps_contents() {
        let storage = MemoryKeyValueStorage::new();
        storage.set_item("a", "1").expect("set should succeed");
        storage.set_available(false);

        let err = storage.get_item("a").expect_err("read must fail while off");
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(storage.set_item("b", "2").is_err());

        storage.set_available(true);
        assert_eq!(storage.get_item("a").expect("get").as_deref(), Some("1"));
        assert_eq!(storage.len(), 1);
    }
}
