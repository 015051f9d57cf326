//! GoMarketplace Cart - the cart state container.
//!
//! This crate owns the authoritative in-memory cart and keeps it in sync
//! with a key-value persistence layer.
//!
//! # Architecture
//!
//! - [`CartStore`] holds the [`CartState`](go_marketplace_core::CartState)
//!   and is the only component that mutates it. Handles are cheap to clone
//!   and all share one state.
//! - [`storage`] defines the async key-value contract the store persists
//!   through, with file-backed and in-memory implementations.
//! - Mutations update memory synchronously and enqueue a write; a
//!   background writer applies writes in mutation order. A failed write is
//!   logged and dropped - it never blocks a caller or disturbs the
//!   in-memory cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod storage;
pub mod store;

pub use error::StorageError;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, PRODUCTS_KEY};
pub use store::CartStore;
