//! The durable store contract.

use std::sync::Arc;

use crate::StoreError;

/// A key-value persistence surface holding serialized text.
///
/// Writes are full replacements: the last write for a key wins and there is
/// no field-level merge.
pub trait DurableStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check if a key exists in the store.
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.read(key)?.is_some())
    }
}

impl<S: DurableStore + ?Sized> DurableStore for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        (**self).exists(key)
    }
}
