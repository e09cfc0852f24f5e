//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{CartError, CheckoutError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart mutation rejected (bad size or quantity).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed (validation, empty cart, or order log failure).
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Reading or writing session data failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true for failures on our side rather than the client's.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_) | Self::Internal(_) | Self::Checkout(CheckoutError::Persistence(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Cart(_) => StatusCode::BAD_REQUEST,
            Self::Checkout(err) => match err {
                CheckoutError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::AlreadyConfirmed => StatusCode::CONFLICT,
                CheckoutError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Cart(err) => json!({ "error": err.to_string() }),
            Self::Checkout(CheckoutError::Validation(fields)) => json!({
                "error": "Please correct the highlighted fields",
                "fields": fields,
            }),
            Self::Checkout(CheckoutError::Persistence(_)) => {
                json!({ "error": "We could not save your order. Please try again." })
            }
            Self::Checkout(err) => json!({ "error": err.to_string() }),
            Self::Session(_) | Self::Internal(_) => json!({ "error": "Internal server error" }),
            Self::NotFound(what) => json!({ "error": format!("Not found: {what}") }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a shopper action as a Sentry breadcrumb.
///
/// Breadcrumbs are attached to any error reported later in the same scope,
/// so a failed checkout shows the cart activity that led up to it.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|&(key, value)| (key.to_owned(), serde_json::Value::from(value)))
            .collect(),
        ..Default::default()
    });
}
