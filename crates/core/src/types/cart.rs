//! Cart line items and cart state.
//!
//! [`CartState`] is the ordered collection of [`CartItem`]s that makes up a
//! cart. All state transitions preserve two invariants: item ids are unique
//! within the sequence, and every item present has a quantity of at least 1.
//! An item whose quantity would drop to 0 is removed from the sequence
//! entirely, never retained with a non-positive value.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// One product line entry in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Identifier of the product this line refers to.
    pub id: ProductId,
    /// Product title as shown to the customer.
    pub title: String,
    /// URL of the product image.
    pub image_url: String,
    /// Unit price of the product.
    pub price: Price,
    /// Number of units in the cart. At least 1 while the item is present.
    pub quantity: u32,
}

/// Input for adding a product to a cart: a [`CartItem`] without a quantity.
///
/// The quantity is owned by the cart. A product enters at quantity 1 and is
/// adjusted through increment/decrement from there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemInput {
    /// Identifier of the product to add.
    pub id: ProductId,
    /// Product title as shown to the customer.
    pub title: String,
    /// URL of the product image.
    pub image_url: String,
    /// Unit price of the product.
    pub price: Price,
}

impl CartItemInput {
    fn into_item(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// The full ordered collection of [`CartItem`]s in a cart.
///
/// Serializes transparently as the item sequence, so the persisted form is
/// a plain JSON array of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a state from raw items, enforcing the invariants.
    ///
    /// Items with a quantity of 0 are dropped; for duplicate ids the first
    /// occurrence wins. Order is otherwise preserved. Used when restoring a
    /// persisted cart whose contents are not trusted.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut state = Self::new();
        for item in items {
            if item.quantity == 0 || state.get(&item.id).is_some() {
                continue;
            }
            state.items.push(item);
        }
        state
    }

    /// The items in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consumes the state and returns the items in cart order.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` across all line items.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items
            .iter()
            .map(|item| item.price.line_total(item.quantity))
            .sum()
    }

    /// Add one unit of a product to the cart.
    ///
    /// If an item with the same id is already present, its quantity goes up
    /// by 1 and the descriptive fields of the input are ignored; otherwise
    /// the product is appended at the end with quantity 1. Calling twice
    /// adds two units; this is the intended "add one more" semantics.
    pub fn add(&mut self, input: CartItemInput) {
        match self.items.iter_mut().find(|item| item.id == input.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(input.into_item(1)),
        }
    }

    /// Increase the quantity of the item with `id` by 1.
    ///
    /// Returns whether a matching item existed. An unmatched id leaves the
    /// state untouched; that is not an error.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        match self.items.iter_mut().find(|item| item.id == *id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Decrease the quantity of the item with `id` by 1, removing the item
    /// entirely when its quantity reaches 0.
    ///
    /// Returns whether a matching item existed. An unmatched id leaves the
    /// state untouched; that is not an error.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let mut found = false;
        for item in &mut self.items {
            if item.id == *id {
                item.quantity = item.quantity.saturating_sub(1);
                found = true;
            }
        }
        self.items.retain(|item| item.quantity > 0);
        found
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(id: &str) -> CartItemInput {
        CartItemInput {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            image_url: format!("https://cdn.example.com/{id}.png"),
            price: Price::from_cents(10_000),
        }
    }

    fn item(id: &str, quantity: u32) -> CartItem {
        input(id).into_item(quantity)
    }

    #[test]
    fn test_add_new_item_starts_at_quantity_one() {
        let mut state = CartState::new();
        state.add(input("shoe"));

        assert_eq!(state.len(), 1);
        let added = state.get(&ProductId::new("shoe")).unwrap();
        assert_eq!(added.quantity, 1);
        assert_eq!(added.title, "Product shoe");
    }

    #[test]
    fn test_add_existing_item_increments_quantity() {
        let mut state = CartState::new();
        state.add(input("shoe"));
        state.add(input("shoe"));

        assert_eq!(state.len(), 1);
        assert_eq!(state.get(&ProductId::new("shoe")).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_quantity_equals_call_count() {
        let mut state = CartState::new();
        for _ in 0..7 {
            state.add(input("shoe"));
        }

        assert_eq!(state.get(&ProductId::new("shoe")).unwrap().quantity, 7);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut state = CartState::new();
        state.add(input("a"));
        state.add(input("b"));
        state.add(input("c"));
        state.add(input("a"));

        let ids: Vec<&str> = state.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_increment_existing_item() {
        let mut state = CartState::from_items(vec![item("a", 1)]);
        assert!(state.increment(&ProductId::new("a")));

        assert_eq!(state.get(&ProductId::new("a")).unwrap().quantity, 2);
    }

    #[test]
    fn test_increment_unknown_id_is_noop() {
        let mut state = CartState::from_items(vec![item("a", 2)]);
        let before = state.clone();

        assert!(!state.increment(&ProductId::new("nonexistent")));
        assert_eq!(state, before);
    }

    #[test]
    fn test_decrement_above_one() {
        let mut state = CartState::from_items(vec![item("a", 3)]);
        assert!(state.decrement(&ProductId::new("a")));

        assert_eq!(state.get(&ProductId::new("a")).unwrap().quantity, 2);
    }

    #[test]
    fn test_decrement_at_one_removes_item() {
        let mut state = CartState::from_items(vec![item("a", 1)]);
        assert!(state.decrement(&ProductId::new("a")));

        assert!(state.is_empty());
        assert!(state.get(&ProductId::new("a")).is_none());
    }

    #[test]
    fn test_decrement_unknown_id_is_noop() {
        let mut state = CartState::from_items(vec![item("a", 1)]);
        let before = state.clone();

        assert!(!state.decrement(&ProductId::new("nonexistent")));
        assert_eq!(state, before);
    }

    #[test]
    fn test_increment_then_decrement_restores_quantity() {
        let mut state = CartState::from_items(vec![item("a", 4)]);
        let id = ProductId::new("a");

        state.increment(&id);
        state.decrement(&id);

        assert_eq!(state.get(&id).unwrap().quantity, 4);
    }

    #[test]
    fn test_no_item_ever_at_zero_quantity() {
        let mut state = CartState::new();
        let id = ProductId::new("a");

        state.add(input("a"));
        state.add(input("b"));
        state.increment(&id);
        state.decrement(&id);
        state.decrement(&id);
        state.decrement(&id);
        state.decrement(&ProductId::new("b"));

        assert!(state.items().iter().all(|item| item.quantity >= 1));
        assert!(state.is_empty());
    }

    #[test]
    fn test_serde_roundtrip_preserves_items_and_order() {
        let mut state = CartState::new();
        state.add(input("b"));
        state.add(input("a"));
        state.add(input("b"));

        let json = serde_json::to_string(&state).unwrap();
        let parsed: CartState = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, state);
        let ids: Vec<&str> = parsed.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let state = CartState::from_items(vec![item("a", 2)]);
        let value = serde_json::to_value(&state).unwrap();

        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        let entry = entries.first().unwrap();
        assert_eq!(entry.get("id").and_then(|v| v.as_str()), Some("a"));
        assert_eq!(
            entry.get("title").and_then(|v| v.as_str()),
            Some("Product a")
        );
        assert_eq!(
            entry.get("image_url").and_then(|v| v.as_str()),
            Some("https://cdn.example.com/a.png")
        );
        assert_eq!(entry.get("quantity").and_then(|v| v.as_u64()), Some(2));
        assert!(entry.get("price").is_some());
    }

    #[test]
    fn test_from_items_drops_zero_quantity() {
        let state = CartState::from_items(vec![item("a", 0), item("b", 2)]);

        assert_eq!(state.len(), 1);
        assert!(state.get(&ProductId::new("a")).is_none());
        assert_eq!(state.get(&ProductId::new("b")).unwrap().quantity, 2);
    }

    #[test]
    fn test_from_items_first_duplicate_wins() {
        let state = CartState::from_items(vec![item("a", 2), item("b", 1), item("a", 5)]);

        assert_eq!(state.len(), 2);
        assert_eq!(state.get(&ProductId::new("a")).unwrap().quantity, 2);
    }

    #[test]
    fn test_total_quantity() {
        let state = CartState::from_items(vec![item("a", 2), item("b", 3)]);
        assert_eq!(state.total_quantity(), 5);
    }

    #[test]
    fn test_subtotal() {
        let mut state = CartState::from_items(vec![item("a", 2)]);
        state.add(CartItemInput {
            price: Price::from_cents(550),
            ..input("b")
        });

        // 2 x $100.00 + 1 x $5.50
        assert_eq!(state.subtotal(), Price::from_cents(20_550));
    }
}
