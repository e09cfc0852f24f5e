//! Cart line items, customer details and committed orders.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shoe_store_core::{Email, OrderNumber, OrderStatus, Phone, Price, ProductId};

use super::Product;

/// One (product, size) pairing with a quantity.
///
/// The product is shared with the catalog rather than copied. Serializing a
/// line item writes the full product so stored orders are self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: Arc<Product>,
    pub size: String,
    pub quantity: u32,
}

impl LineItem {
    /// Returns true if this line item is for `product_id` in `size`.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, size: &str) -> bool {
        self.product.id == product_id && self.size == size
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Validated customer details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: Email,
    pub phone: Phone,
    /// Shipping address, free-form.
    pub address: String,
}

/// An immutable record of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderNumber,
    /// Cart contents at commit time.
    pub items: Vec<LineItem>,
    pub customer_info: CustomerInfo,
    pub total: Price,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Sum of item quantities in the order.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
