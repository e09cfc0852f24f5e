//! Product route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use shoe_store_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Listing filter.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Only list products in this category (case-insensitive).
    pub category: Option<String>,
}

/// List the catalog in display order.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Arc<Product>>> {
    let catalog = state.catalog();
    let products = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            catalog.in_category(category).cloned().collect()
        }
        _ => catalog.products().to_vec(),
    };

    Json(products)
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Arc<Product>>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
