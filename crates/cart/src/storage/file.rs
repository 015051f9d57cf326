//! File-backed key-value storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

/// Durable key-value storage keeping one file per key under a root
/// directory.
///
/// Keys are percent-encoded into filenames, so keys like
/// `"@GoMarketplace:products"` are safe on any filesystem. Writes go to a
/// temp file first and are renamed into place, so a reader always finds
/// either the old blob or the new one, never a truncated entry.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Directory this storage keeps its entries in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(urlencoding::encode(key).as_ref())
    }

    // ".tmp" is appended rather than set via with_extension so a key whose
    // encoding contains a dot cannot collide with another key's temp file.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.tmp", urlencoding::encode(key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.entry_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let temp = self.temp_path(key);
        tokio::fs::write(&temp, value).await?;
        tokio::fs::rename(&temp, self.entry_path(key)).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
