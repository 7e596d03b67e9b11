//! JSON API handlers.
//!
//! Machine-readable views of the same state the HTML pages render.

use axum::{Json, extract::State};
use fake_store_core::{Cart, CatalogItem, total_count};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::catalog::CatalogStatus;
use crate::error::Result;
use crate::services::SessionCart;
use crate::state::AppState;

/// Catalog status response.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// One of `loading`, `failed`, `loaded`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<CatalogItem>>,
}

/// Cart contents response.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Cart,
    pub total_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            total_count: total_count(&cart),
            subtotal: cart.subtotal(),
            items: cart,
        }
    }
}

/// Current catalog status, with products once loaded.
#[instrument(skip(state))]
pub async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let status = state.catalog_status();
    let products = match &status {
        CatalogStatus::Loaded(products) => Some(products.to_vec()),
        CatalogStatus::Loading | CatalogStatus::Failed => None,
    };

    Json(CatalogResponse {
        status: status.as_str(),
        products,
    })
}

/// Current cart for this session.
#[instrument(skip(cart))]
pub async fn cart(cart: SessionCart) -> Result<Json<CartResponse>> {
    let cart = cart.load().await?;
    Ok(Json(CartResponse::from(cart)))
}
