//! Catalog product model.

use serde::{Deserialize, Serialize};

use shoe_store_core::{Price, ProductId};

/// A read-only catalog entry.
///
/// Products are created once when the catalog is built and shared by
/// reference from cart line items and orders; nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Available size labels, in display order.
    pub sizes: Vec<String>,
}

impl Product {
    /// Returns true if `size` is one of this product's size labels.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }
}
