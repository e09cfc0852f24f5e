//! Cart route handlers.
//!
//! Each visitor's [`CartStore`] lives in their session. Handlers load it,
//! apply one mutation and save it back before responding with a fresh
//! [`CartSnapshot`].

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use shoe_store_core::ProductId;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::services::{CartSnapshot, CartStore};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's cart, or an empty one if they have none yet.
pub(crate) async fn load_cart(session: &Session) -> Result<CartStore> {
    Ok(session
        .get::<CartStore>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Save the visitor's cart.
pub(crate) async fn save_cart(session: &Session, cart: &CartStore) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
    pub quantity: Option<u32>,
}

/// Update quantity request. A quantity of zero or less removes the item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub size: String,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartSnapshot>> {
    let cart = load_cart(&session).await?;
    Ok(Json(cart.snapshot()))
}

/// Add an item to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartSnapshot>> {
    let product = state
        .catalog()
        .get(request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let mut cart = load_cart(&session).await?;
    cart.add_item(product, &request.size, request.quantity.unwrap_or(1))?;
    save_cart(&session, &cart).await?;

    let product_id = request.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", product_id.as_str()), ("size", request.size.as_str())],
    );

    Ok(Json(cart.snapshot()))
}

/// Set the quantity of a cart item.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartSnapshot>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(request.product_id, &request.size, request.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(cart.snapshot()))
}

/// Remove an item from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartSnapshot>> {
    let mut cart = load_cart(&session).await?;
    if cart.remove_item(request.product_id, &request.size).is_some() {
        save_cart(&session, &cart).await?;
    }

    Ok(Json(cart.snapshot()))
}

/// Cart count badge: total quantity across all items.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.total_items(),
    }))
}
