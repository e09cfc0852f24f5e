//! Checkout route handlers.
//!
//! The visitor's [`CheckoutSession`] is kept in the session next to their
//! cart. Submitting runs the order commit on the blocking pool because it
//! reads and rewrites the order log file.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::routes::cart::{load_cart, save_cart};
use crate::services::{CartSnapshot, CheckoutField, CheckoutForm, CheckoutSession};
use crate::state::AppState;

async fn load_checkout(session: &Session) -> Result<CheckoutSession> {
    Ok(session
        .get::<CheckoutSession>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

async fn save_checkout(session: &Session, checkout: &CheckoutSession) -> Result<()> {
    session.insert(session_keys::CHECKOUT, checkout).await?;
    Ok(())
}

/// Checkout page state: the flow step, form, field errors and the order
/// summary of the current cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    #[serde(flatten)]
    pub checkout: CheckoutSession,
    pub cart: CartSnapshot,
}

/// Single field edit.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: CheckoutField,
    pub value: String,
}

async fn view(session: &Session, checkout: CheckoutSession) -> Result<Json<CheckoutView>> {
    let cart = load_cart(session).await?;
    Ok(Json(CheckoutView {
        checkout,
        cart: cart.snapshot(),
    }))
}

/// Show the checkout state.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CheckoutView>> {
    let checkout = load_checkout(&session).await?;
    view(&session, checkout).await
}

/// Edit one form field, clearing its error.
#[instrument(skip(session, update), fields(field = ?update.field))]
pub async fn update_field(
    session: Session,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    checkout.update_field(update.field, update.value);
    save_checkout(&session, &checkout).await?;

    view(&session, checkout).await
}

/// Submit the checkout form and place the order.
///
/// A body replaces the stored form before validation; without one the form
/// built up through `/checkout/field` is submitted as is. The session is
/// saved whatever the outcome so field errors survive the round trip.
#[instrument(skip(state, session, body))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    body: Option<Json<CheckoutForm>>,
) -> Result<(StatusCode, Json<CheckoutView>)> {
    let mut checkout = load_checkout(&session).await?;
    if let Some(Json(form)) = body {
        checkout.update_form(form);
    }
    let mut cart = load_cart(&session).await?;

    let (checkout, cart, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = checkout.submit(state.checkout(), &mut cart).map(|_| ());
        (checkout, cart, outcome)
    })
    .await
    .map_err(|e| AppError::Internal(format!("checkout task failed: {e}")))?;

    save_checkout(&session, &checkout).await?;
    save_cart(&session, &cart).await?;
    outcome?;

    if let Some(order) = checkout.receipt() {
        add_breadcrumb("checkout", "Order placed", &[("order_id", order.id.as_str())]);
    }

    Ok((
        StatusCode::CREATED,
        Json(CheckoutView {
            checkout,
            cart: cart.snapshot(),
        }),
    ))
}

/// Close the confirmation or abandon the form and start over.
#[instrument(skip(session))]
pub async fn reset(session: Session) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    checkout.reset();
    save_checkout(&session, &checkout).await?;

    view(&session, checkout).await
}
