//! In-process store backed by a map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::{DurableStore, StoreError};

/// A [`DurableStore`] that lives only as long as the process.
///
/// Counts accepted writes so callers can assert that an operation did or
/// did not touch persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Number of writes accepted since creation.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl DurableStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::StoreError("memory store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.read("cart:v1").unwrap(), None);
        assert!(!store.exists("cart:v1").unwrap());
    }

    #[test]
    fn test_write_replaces_value() {
        let store = MemoryStore::new();
        store.write("cart:v1", "[1]").unwrap();
        store.write("cart:v1", "[2]").unwrap();

        assert_eq!(store.read("cart:v1").unwrap().as_deref(), Some("[2]"));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_with_value_does_not_count_as_write() {
        let store = MemoryStore::with_value("cart:v1", "[]");
        assert_eq!(store.read("cart:v1").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::with_value("a", "1");
        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.read("a").unwrap(), None);
    }
}
