//! In-memory key-value storage.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

/// Ephemeral key-value storage backed by a `HashMap`.
///
/// Nothing survives the process. Meant for tests and for running a cart
/// without a durable backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Backend("storage lock poisoned".to_owned()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Backend("storage lock poisoned".to_owned()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Backend("storage lock poisoned".to_owned()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove_flow() {
        let storage = MemoryStorage::new();

        storage.set("key", "value").await.unwrap();
        assert_eq!(storage.get("key").await.unwrap().as_deref(), Some("value"));

        storage.remove("key").await.unwrap();
        assert!(storage.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("missing").await.is_ok());
    }
}
