//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Session cart: line items keyed by (product, size), totals
//! - `checkout` - Customer form validation and order commit

pub mod cart;
pub mod checkout;

pub use cart::{CartError, CartSnapshot, CartStore};
pub use checkout::{
    CheckoutError, CheckoutErrors, CheckoutField, CheckoutForm, CheckoutProcessor,
    CheckoutSession, CheckoutStep,
};
