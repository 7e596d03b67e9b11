//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::catalog::CatalogStatus;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has been loaded.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog_status() {
        CatalogStatus::Loaded(_) => StatusCode::OK,
        CatalogStatus::Loading | CatalogStatus::Failed => StatusCode::SERVICE_UNAVAILABLE,
    }
}
