//! Session cart.
//!
//! A [`CartStore`] is an ordered list of line items keyed by
//! (product id, size). Adding an existing key increases its quantity instead
//! of appending a duplicate, so every key appears at most once and the list
//! keeps insertion order for display.
//!
//! The store is a plain owned value. The HTTP layer keeps one per visitor in
//! the session and threads it through each handler explicitly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use shoe_store_core::{Price, ProductId};

use crate::models::{LineItem, Product};

/// Errors from cart mutations. None of them change the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No size was chosen before adding to the cart.
    #[error("Please select a size")]
    MissingSize,

    /// The chosen size is not offered for the product.
    #[error("Size {size} is not available for {product}")]
    InvalidSelection {
        /// Product name.
        product: String,
        /// Requested size label.
        size: String,
    },

    /// Items must be added at least one at a time.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// Point-in-time view of the cart for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    /// Sum of quantities (badge count), not the number of entries.
    pub total_items: u64,
    pub total_price: Price,
}

/// The visitor's shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartStore {
    items: Vec<LineItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` of `product` in `size`.
    ///
    /// If the cart already holds this (product, size) pair its quantity is
    /// increased; otherwise a new line item is appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingSize`] if `size` is empty
    /// - [`CartError::InvalidSelection`] if `size` is not one of `product.sizes`
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero
    pub fn add_item(
        &mut self,
        product: Arc<Product>,
        size: &str,
        quantity: u32,
    ) -> Result<(), CartError> {
        if size.is_empty() {
            return Err(CartError::MissingSize);
        }

        if !product.has_size(size) {
            return Err(CartError::InvalidSelection {
                product: product.name.clone(),
                size: size.to_string(),
            });
        }

        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if let Some(item) = self.find_mut(product.id, size) {
            item.quantity = item.quantity.saturating_add(quantity);
            debug!(
                product_id = %product.id,
                size,
                quantity = item.quantity,
                "Increased cart line quantity"
            );
        } else {
            debug!(product_id = %product.id, size, quantity, "Added cart line");
            self.items.push(LineItem {
                product,
                size: size.to_string(),
                quantity,
            });
        }

        Ok(())
    }

    /// Set the quantity of an existing line item.
    ///
    /// A quantity of zero or less removes the line item. Unknown keys are
    /// ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, size: &str, new_quantity: i64) {
        if new_quantity <= 0 {
            self.remove_item(product_id, size);
            return;
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.find_mut(product_id, size) {
            item.quantity = quantity;
            debug!(product_id = %product_id, size, quantity, "Updated cart line quantity");
        }
    }

    /// Remove the line item for (product, size), returning it if present.
    pub fn remove_item(&mut self, product_id: ProductId, size: &str) -> Option<LineItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.matches(product_id, size))?;
        debug!(product_id = %product_id, size, "Removed cart line");
        Some(self.items.remove(index))
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line item by key.
    #[must_use]
    pub fn get(&self, product_id: ProductId, size: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.matches(product_id, size))
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all line items.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` across all line items.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Capture the current items and totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }

    fn find_mut(&mut self, product_id: ProductId, size: &str) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.matches(product_id, size))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn product(id: i32) -> Arc<Product> {
        Catalog::builtin().get(ProductId::new(id)).unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let cart = CartStore::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_price().is_zero());
        assert!(cart.snapshot().items.is_empty());
    }

    #[test]
    fn test_same_key_accumulates() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 1).unwrap();
        cart.add_item(product(1), "9", 2).unwrap();
        cart.add_item(product(1), "9", 4).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1), "9").unwrap().quantity, 7);
    }

    #[test]
    fn test_different_sizes_are_distinct() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 1).unwrap();
        cart.add_item(product(1), "10", 1).unwrap();

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartStore::new();
        cart.add_item(product(3), "8", 1).unwrap();
        cart.add_item(product(1), "9", 1).unwrap();
        cart.add_item(product(3), "8", 1).unwrap();
        cart.add_item(product(2), "7", 1).unwrap();

        let keys: Vec<_> = cart
            .items()
            .iter()
            .map(|item| (item.product.id.as_i32(), item.size.as_str()))
            .collect();
        assert_eq!(keys, vec![(3, "8"), (1, "9"), (2, "7")]);
    }

    #[test]
    fn test_invalid_size_is_rejected_without_mutation() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 1).unwrap();
        let before = cart.clone();

        let err = cart.add_item(product(1), "13", 1).unwrap_err();
        assert_eq!(
            err,
            CartError::InvalidSelection {
                product: "Classic Runner".to_string(),
                size: "13".to_string(),
            }
        );
        assert_eq!(cart.add_item(product(1), "", 1), Err(CartError::MissingSize));
        assert_eq!(err.to_string(), "Size 13 is not available for Classic Runner");
        assert_eq!(cart, before);
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut cart = CartStore::new();
        assert_eq!(
            cart.add_item(product(1), "9", 0),
            Err(CartError::InvalidQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap();

        cart.update_quantity(ProductId::new(1), "9", 5);
        assert_eq!(cart.get(ProductId::new(1), "9").unwrap().quantity, 5);

        cart.update_quantity(ProductId::new(1), "9", 1);
        assert_eq!(cart.get(ProductId::new(1), "9").unwrap().quantity, 1);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap();
        cart.add_item(product(2), "9", 2).unwrap();

        cart.update_quantity(ProductId::new(1), "9", 0);
        assert!(cart.get(ProductId::new(1), "9").is_none());

        cart.update_quantity(ProductId::new(2), "9", -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_key_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap();
        let before = cart.clone();

        cart.update_quantity(ProductId::new(1), "10", 4);
        cart.update_quantity(ProductId::new(5), "9", 4);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap();
        cart.add_item(product(2), "10", 1).unwrap();

        let removed = cart.remove_item(ProductId::new(1), "9").unwrap();
        assert_eq!(removed.quantity, 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].product.id, ProductId::new(2));
    }

    #[test]
    fn test_remove_missing_leaves_cart_unchanged() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap();
        cart.add_item(product(2), "10", 1).unwrap();
        let before = serde_json::to_string(&cart).unwrap();

        assert!(cart.remove_item(ProductId::new(1), "10").is_none());
        assert!(cart.remove_item(ProductId::new(4), "9").is_none());
        assert_eq!(serde_json::to_string(&cart).unwrap(), before);
    }

    #[test]
    fn test_total_items_counts_quantities() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap();
        cart.add_item(product(2), "10", 3).unwrap();

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_total_price() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap(); // 2 x 129
        cart.add_item(product(3), "11", 1).unwrap(); // 1 x 199

        assert_eq!(cart.total_price(), Price::from_whole(457));
    }

    #[test]
    fn test_accumulate_then_zero_scenario() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 1).unwrap();
        cart.add_item(product(1), "9", 2).unwrap();

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].quantity, 3);
        assert_eq!(snapshot.total_price, Price::from_whole(387));

        cart.update_quantity(ProductId::new(1), "9", 0);
        assert!(cart.is_empty());
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_clear() {
        let mut cart = CartStore::new();
        cart.add_item(product(1), "9", 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_session_roundtrip_keeps_items() {
        let mut cart = CartStore::new();
        cart.add_item(product(4), "12", 2).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        let restored: CartStore = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}
