//! Key-value persistence contract and backends.
//!
//! The cart survives restarts by writing its serialized state through a
//! small async key-value interface. [`FileStorage`] is the durable
//! device-local backend; [`MemoryStorage`] keeps entries in process memory
//! for tests and ephemeral carts.

use async_trait::async_trait;

use crate::error::StorageError;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage key under which the serialized cart is persisted.
pub const PRODUCTS_KEY: &str = "@GoMarketplace:products";

/// Async key-value storage for serialized blobs.
///
/// Implementations must be shareable across tasks; the store drives them
/// from a background writer. Operations overwrite or delete whole entries -
/// there are no partial updates.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Get a previously stored blob, or `None` if the key has no entry.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a blob under `key`, overwriting any existing entry.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the entry under `key`.
    ///
    /// Removing a key that has no entry is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
