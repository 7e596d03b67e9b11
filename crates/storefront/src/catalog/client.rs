//! HTTP client for the remote catalog API.

use std::sync::Arc;

use fake_store_core::CatalogItem;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;
use crate::config::CatalogConfig;

/// Client for the product catalog endpoint.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.url.clone(),
            }),
        })
    }

    /// The configured catalog endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Http` on transport failure or timeout
    /// - `CatalogError::Status` if the API answers with a non-2xx status
    /// - `CatalogError::Parse` if the body is not an array of catalog items
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let products: Vec<CatalogItem> = serde_json::from_slice(&body)?;

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }
}
