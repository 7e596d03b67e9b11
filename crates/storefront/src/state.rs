//! Application state shared across handlers.

use std::sync::Arc;

use fake_store_core::{CatalogItem, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogClient, CatalogError, CatalogStatus};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the catalog client and the current catalog status.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    catalog_status: watch::Sender<CatalogStatus>,
}

impl AppState {
    /// Create a new application state with the catalog in the `Loading` state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let (catalog_status, _) = watch::channel(CatalogStatus::Loading);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                catalog_status,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Snapshot of the current catalog status.
    #[must_use]
    pub fn catalog_status(&self) -> CatalogStatus {
        self.inner.catalog_status.borrow().clone()
    }

    /// Find a product in the loaded catalog.
    ///
    /// Returns `None` while the catalog is loading, after a failed fetch, or
    /// when no product has this id.
    #[must_use]
    pub fn find_product(&self, id: ProductId) -> Option<CatalogItem> {
        self.inner.catalog_status.borrow().find(id).cloned()
    }

    /// Fetch the catalog once and publish the outcome.
    ///
    /// Failures are logged and reported to Sentry, then surfaced as
    /// `CatalogStatus::Failed`. There is no retry.
    pub async fn load_catalog(&self) {
        let catalog = self.catalog();
        let status = match catalog.fetch_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "Catalog loaded");
                CatalogStatus::Loaded(products.into())
            }
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                tracing::error!(
                    error = %e,
                    sentry_event_id = %event_id,
                    endpoint = %catalog.endpoint(),
                    "Failed to fetch catalog"
                );
                CatalogStatus::Failed
            }
        };

        self.inner.catalog_status.send_replace(status);
    }

    /// Start the catalog fetch in the background.
    ///
    /// Handlers keep serving (and rendering the loading state) while the
    /// fetch is in flight.
    pub fn start_catalog_fetch(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move { state.load_catalog().await })
    }
}
