//! Integration tests for GoMarketplace.
//!
//! The tests under `tests/` exercise the cart store end to end against real
//! storage backends:
//!
//! - `cart_persistence` - Restart survival over [`FileStorage`], corrupt
//!   blob fallback, restore sanitization, and empty-cart entry removal
//! - `cart_write_failures` - Write ordering and isolation of the in-memory
//!   cart from a failing persistence layer
//!
//! This crate holds the shared test doubles and helpers.
//!
//! [`FileStorage`]: go_marketplace_cart::FileStorage

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use go_marketplace_cart::{KeyValueStorage, MemoryStorage, StorageError};
use go_marketplace_core::{CartItemInput, Price, ProductId};

/// A product descriptor for test carts, priced at $49.90.
#[must_use]
pub fn sample_input(id: &str) -> CartItemInput {
    CartItemInput {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://cdn.example.com/{id}.png"),
        price: Price::from_cents(4990),
    }
}

/// Storage double whose writes can be made to fail on demand.
///
/// Reads and writes pass through to an inner [`MemoryStorage`] while the
/// double is healthy. Once [`fail_writes`](Self::fail_writes) is called,
/// every `set` and `remove` returns a backend error and the inner entries
/// stay as they were, which is how a full disk or revoked permission looks
/// to the cart's writer task. Reads keep working throughout.
#[derive(Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    failing: AtomicBool,
    rejected: AtomicUsize,
}

impl FailingStorage {
    /// Create a healthy double with no entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` and `remove` fail.
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Let writes through again.
    pub fn heal(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    /// Number of writes rejected so far.
    #[must_use]
    pub fn rejected_writes(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(StorageError::Backend("write rejected".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FailingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.inner.remove(key).await
    }
}
