//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (catalog grid, cart badge, cart drawer)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loaded)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart drawer contents
//! POST /cart/add               - Add one unit (returns drawer, triggers cart-updated)
//! POST /cart/remove            - Remove one unit (returns drawer, triggers cart-updated)
//! GET  /cart/count             - Cart count badge
//!
//! # JSON API
//! GET  /api/catalog            - Catalog status and products
//! GET  /api/cart               - Cart lines, total count, subtotal
//! ```

pub mod api;
pub mod cart;
pub mod health;
pub mod home;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(api::catalog))
        .route("/cart", get(api::cart))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Cart routes
        .nest("/cart", cart_routes())
        // JSON API
        .nest("/api", api_routes())
        .fallback(not_found)
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
