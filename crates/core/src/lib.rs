//! GoMarketplace Core - Shared types library.
//!
//! This crate provides common types used across all GoMarketplace components:
//! - `cart` - Cart state container with key-value persistence
//! - `cli` - Command-line tools for inspecting and mutating a cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Cart domain types: product ids, prices, line items, and
//!   the cart state itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
