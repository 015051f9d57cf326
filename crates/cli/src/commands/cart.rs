//! Cart management commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli cart show
//!
//! # Add a product, then adjust its quantity
//! gm-cli cart add --id battery-pack --title "Battery Pack" --price 49.90
//! gm-cli cart increment battery-pack
//! gm-cli cart decrement battery-pack
//! ```
//!
//! # Environment Variables
//!
//! - `GM_DATA_DIR` - Directory the cart persists in (default: `.gomarketplace`)

use std::sync::Arc;

use go_marketplace_cart::{CartStore, FileStorage, StorageError};
use go_marketplace_core::{CartItemInput, Price, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::{CartConfig, ConfigError};

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The storage directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Open the persisted cart configured by the environment.
async fn open_store() -> Result<CartStore, CartError> {
    let config = CartConfig::from_env()?;
    let storage = FileStorage::new(config.data_dir).await?;
    Ok(CartStore::open(Arc::new(storage)).await)
}

/// Show the cart contents and totals.
pub async fn show() -> Result<(), CartError> {
    let store = open_store().await?;
    let cart = store.products();

    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return Ok(());
    }

    tracing::info!("Cart contents:");
    for item in cart.items() {
        tracing::info!(
            "  {} x{} @ {} - {}",
            item.id,
            item.quantity,
            item.price,
            item.title
        );
    }
    tracing::info!(
        "{} units, subtotal {}",
        cart.total_quantity(),
        cart.subtotal()
    );

    Ok(())
}

/// Add one unit of a product to the cart.
pub async fn add(id: &str, title: &str, price: Decimal, image_url: &str) -> Result<(), CartError> {
    let store = open_store().await?;

    let cart = store.add_to_cart(CartItemInput {
        id: ProductId::new(id),
        title: title.to_owned(),
        image_url: image_url.to_owned(),
        price: Price::new(price),
    });
    store.flush().await;

    let quantity = cart.get(&ProductId::new(id)).map_or(0, |item| item.quantity);
    tracing::info!("Added {}, now at quantity {}", id, quantity);
    Ok(())
}

/// Add one unit to an item already in the cart.
pub async fn increment(id: &str) -> Result<(), CartError> {
    let store = open_store().await?;
    let product_id = ProductId::new(id);

    let cart = store.increment(&product_id);
    store.flush().await;

    match cart.get(&product_id) {
        Some(item) => tracing::info!("{} now at quantity {}", id, item.quantity),
        None => tracing::warn!("No item with id {} in the cart", id),
    }
    Ok(())
}

/// Remove one unit from an item in the cart.
pub async fn decrement(id: &str) -> Result<(), CartError> {
    let store = open_store().await?;
    let product_id = ProductId::new(id);

    let had_item = store.products().get(&product_id).is_some();
    let cart = store.decrement(&product_id);
    store.flush().await;

    if had_item {
        match cart.get(&product_id) {
            Some(item) => tracing::info!("{} now at quantity {}", id, item.quantity),
            None => tracing::info!("Removed {} from the cart", id),
        }
    } else {
        tracing::warn!("No item with id {} in the cart", id);
    }
    Ok(())
}
