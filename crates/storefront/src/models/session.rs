//! Types stored in the session.

/// Session keys for per-visitor state.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's checkout form and confirmation state.
    pub const CHECKOUT: &str = "checkout";
}
