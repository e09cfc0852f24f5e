//! Domain models for the storefront.

pub mod order;
pub mod product;
pub mod session;

pub use order::{CustomerInfo, LineItem, Order};
pub use product::Product;

/// Session key re-exports for convenience.
pub use session::keys as session_keys;
