//! Home page route handler.
//!
//! Renders one of three catalog states (loading, failed, loaded) next to the
//! cart badge and drawer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use fake_store_core::CatalogItem;
use tracing::instrument;

use super::cart::{CartView, format_price};
use crate::catalog::CatalogStatus;
use crate::error::Result;
use crate::services::SessionCart;
use crate::state::AppState;

/// Message shown when the catalog could not be fetched.
pub const CATALOG_ERROR_MESSAGE: &str = "Something went wrong";

/// Seconds between reloads while the catalog is still being fetched.
const LOADING_REFRESH_SECS: u32 = 2;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub price: String,
}

impl From<&CatalogItem> for ProductView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.as_i32(),
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            image: item.image.clone(),
            price: format_price(item.price),
        }
    }
}

/// Catalog section display data.
///
/// Exactly one of `loading`, `failed`, or a (possibly empty) product grid.
#[derive(Clone)]
pub struct CatalogView {
    pub loading: bool,
    pub failed: bool,
    pub products: Vec<ProductView>,
}

impl From<&CatalogStatus> for CatalogView {
    fn from(status: &CatalogStatus) -> Self {
        Self {
            loading: matches!(status, CatalogStatus::Loading),
            failed: matches!(status, CatalogStatus::Failed),
            products: status.products().iter().map(ProductView::from).collect(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub catalog: CatalogView,
    pub cart: CartView,
    pub error_message: &'static str,
    pub refresh_secs: u32,
}

/// Display the home page.
#[instrument(skip(state, cart))]
pub async fn home(State(state): State<AppState>, cart: SessionCart) -> Result<impl IntoResponse> {
    let cart = cart.load().await?;

    Ok(HomeTemplate {
        catalog: CatalogView::from(&state.catalog_status()),
        cart: CartView::from(&cart),
        error_message: CATALOG_ERROR_MESSAGE,
        refresh_secs: LOADING_REFRESH_SECS,
    })
}
