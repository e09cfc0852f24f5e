//! HTTP route handlers for the storefront.
//!
//! All bodies are JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Catalog listing (?category=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart snapshot
//! POST /cart/add               - Add item {productId, size, quantity?}
//! POST /cart/update            - Set quantity {productId, size, quantity}
//! POST /cart/remove            - Remove item {productId, size}
//! GET  /cart/count             - Cart count badge
//!
//! # Checkout
//! GET  /checkout               - Checkout state with order summary
//! POST /checkout               - Submit form and place the order
//! POST /checkout/field         - Edit one field {field, value}
//! POST /checkout/reset         - Back to an empty form
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/field", post(checkout::update_field))
        .route("/reset", post(checkout::reset))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
