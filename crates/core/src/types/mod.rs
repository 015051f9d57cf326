//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{CartItem, CartItemInput, CartState};
pub use id::ProductId;
pub use price::Price;
