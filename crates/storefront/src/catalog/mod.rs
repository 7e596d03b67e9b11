//! Remote product catalog: HTTP client and load status.
//!
//! # Architecture
//!
//! - The catalog is fetched exactly once, on start-up, with a single GET
//! - No retry, no backoff: the fetch either loads the catalog or fails
//! - The outcome is published as a [`CatalogStatus`] that handlers read
//!   without blocking on the fetch
//!
//! # Example
//!
//! ```rust,ignore
//! use fake_store_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let products = client.fetch_products().await?;
//! ```

mod client;

use std::sync::Arc;

use fake_store_core::{CatalogItem, ProductId};
use thiserror::Error;

pub use client::CatalogClient;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog API answered with a non-success status.
    #[error("Catalog API returned status {0}")]
    Status(u16),

    /// Response body did not match the catalog shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the single catalog fetch currently stands.
///
/// The three states are mutually exclusive and map one-to-one onto what the
/// home page renders: a progress bar, a generic error, or the product grid.
#[derive(Debug, Clone, Default)]
pub enum CatalogStatus {
    /// Fetch in flight.
    #[default]
    Loading,
    /// Fetch failed (network, status or parse error).
    Failed,
    /// Catalog available.
    Loaded(Arc<[CatalogItem]>),
}

impl CatalogStatus {
    /// Short machine-readable name, used by the JSON API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Failed => "failed",
            Self::Loaded(_) => "loaded",
        }
    }

    /// Loaded products, or an empty slice in the other states.
    #[must_use]
    pub fn products(&self) -> &[CatalogItem] {
        match self {
            Self::Loaded(products) => products,
            Self::Loading | Self::Failed => &[],
        }
    }

    /// Find a loaded product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CatalogItem> {
        self.products().iter().find(|product| product.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32) -> CatalogItem {
        CatalogItem {
            id: ProductId::new(id),
            category: "jewelery".to_string(),
            description: "Gold plated".to_string(),
            image: "https://fakestoreapi.com/img/ring.jpg".to_string(),
            price: Decimal::new(1999, 2),
            title: format!("Ring {id}"),
        }
    }

    #[test]
    fn test_status_names() {
        assert_eq!(CatalogStatus::Loading.as_str(), "loading");
        assert_eq!(CatalogStatus::Failed.as_str(), "failed");
        assert_eq!(CatalogStatus::Loaded(Arc::from([])).as_str(), "loaded");
    }

    #[test]
    fn test_find_in_loaded_catalog() {
        let status = CatalogStatus::Loaded(vec![product(1), product(2)].into());

        assert_eq!(status.find(ProductId::new(2)).unwrap().title, "Ring 2");
        assert!(status.find(ProductId::new(3)).is_none());
    }

    #[test]
    fn test_find_before_load() {
        assert!(CatalogStatus::Loading.find(ProductId::new(1)).is_none());
        assert!(CatalogStatus::Failed.products().is_empty());
    }

    #[test]
    fn test_catalog_error_display() {
        assert_eq!(
            CatalogError::Status(503).to_string(),
            "Catalog API returned status 503"
        );

        let parse = serde_json::from_str::<Vec<CatalogItem>>("{}").unwrap_err();
        assert!(
            CatalogError::from(parse)
                .to_string()
                .starts_with("JSON parse error")
        );
    }
}
