//! Category endpoints and the two category fetch strategies.
//!
//! [`CategoryClient::get_all`] goes through [`CatalogTransport`] and fails on
//! any non-success status. [`RawCategoryFetcher`] issues the same request
//! outside the transport, parses the body as JSON whatever the status is and
//! hands it back as [`RawCategories`]; it only fails when the request itself
//! fails or the body is not JSON. Callers that depend on either behavior pick
//! the matching [`CategoryFetcher`].

use std::future::Future;

use ng_store_core::Category;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::catalog::transport::{CatalogTransport, endpoint_url};
use crate::catalog::{CatalogError, RawFetchError};

/// A way of retrieving the full category list.
pub trait CategoryFetcher {
    /// Error produced by this strategy.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch every category.
    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send;
}

// =============================================================================
// Raw fetch strategy
// =============================================================================

/// Body returned by the raw category fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCategories {
    /// The body was a category list.
    List(Vec<Category>),
    /// Any other JSON body (e.g., an error object), unchanged.
    Other(Value),
}

impl RawCategories {
    /// The category list, or an empty list for any other body.
    #[must_use]
    pub fn into_categories(self) -> Vec<Category> {
        match self {
            Self::List(categories) => categories,
            Self::Other(_) => Vec::new(),
        }
    }
}

impl From<Value> for RawCategories {
    fn from(body: Value) -> Self {
        Vec::<Category>::deserialize(&body).map_or(Self::Other(body), Self::List)
    }
}

/// Category fetcher that bypasses the transport and skips status checks.
#[derive(Clone)]
pub struct RawCategoryFetcher {
    client: reqwest::Client,
    url: Url,
}

impl RawCategoryFetcher {
    /// Create a fetcher for `{api_url}/api/v1/categories`.
    #[must_use]
    pub fn new(client: reqwest::Client, api_url: &Url) -> Self {
        Self {
            client,
            url: endpoint_url(api_url, &["categories"]),
        }
    }

    /// The URL this fetcher requests.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch and parse the body without inspecting the status.
    ///
    /// # Errors
    ///
    /// - [`RawFetchError::Network`] if the request fails
    /// - [`RawFetchError::Json`] if the body is not valid JSON
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<RawCategories, RawFetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| RawFetchError::Network(e.to_string()))?;

        debug!(status = %response.status(), "Raw category response received");

        let body = response
            .bytes()
            .await
            .map_err(|e| RawFetchError::Network(e.to_string()))?;

        let body: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Raw category body is not JSON");
            RawFetchError::Json(e.to_string())
        })?;

        Ok(RawCategories::from(body))
    }
}

impl CategoryFetcher for RawCategoryFetcher {
    type Error = RawFetchError;

    async fn fetch_categories(&self) -> Result<Vec<Category>, RawFetchError> {
        let body = self.fetch().await?;
        if let RawCategories::Other(other) = &body {
            debug!(body = %other, "Raw category body is not a category list");
        }
        Ok(body.into_categories())
    }
}

// =============================================================================
// CategoryClient
// =============================================================================

/// Client for the category endpoint.
#[derive(Clone)]
pub struct CategoryClient {
    transport: CatalogTransport,
    raw: RawCategoryFetcher,
}

impl CategoryClient {
    /// Create a client. The raw path shares the transport's HTTP client and
    /// therefore its timeout.
    #[must_use]
    pub fn new(transport: CatalogTransport) -> Self {
        let raw = RawCategoryFetcher::new(transport.client().clone(), transport.base_url());
        Self { transport, raw }
    }

    /// List every category through the transport.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success status or transport failure.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Category>, CatalogError> {
        self.transport
            .request(Method::GET, &["categories"], None)
            .await
    }

    /// List every category through the raw fetch path.
    ///
    /// # Errors
    ///
    /// Returns an error only if the request fails or the body is not JSON.
    pub async fn get_all_raw(&self) -> Result<RawCategories, RawFetchError> {
        self.raw.fetch().await
    }

    /// The raw fetch strategy, for callers that want it as a [`CategoryFetcher`].
    #[must_use]
    pub const fn raw(&self) -> &RawCategoryFetcher {
        &self.raw
    }
}

impl CategoryFetcher for CategoryClient {
    type Error = CatalogError;

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.get_all().await
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_fetcher_url_has_no_query() {
        let base = Url::parse("https://api.escuelajs.co/?token=abc").unwrap_or_else(|e| panic!("{e}"));
        let fetcher = RawCategoryFetcher::new(reqwest::Client::new(), &base);

        assert_eq!(
            fetcher.url().as_str(),
            "https://api.escuelajs.co/api/v1/categories"
        );
    }

    #[test]
    fn test_raw_body_list_or_other() {
        let list = RawCategories::from(serde_json::json!([{
            "id": 1,
            "name": "Clothes",
            "image": "https://i.imgur.com/QkIa5tT.jpeg",
            "slug": "clothes"
        }]));
        assert!(matches!(&list, RawCategories::List(c) if c.len() == 1 && c[0].slug == "clothes"));

        let error = serde_json::json!({ "message": "Not Found", "statusCode": 404 });
        let other = RawCategories::from(error.clone());
        assert_eq!(other, RawCategories::Other(error));
        assert!(other.into_categories().is_empty());
    }

    #[test]
    fn test_both_strategies_target_same_endpoint() {
        let base = Url::parse("http://localhost:9000").unwrap_or_else(|e| panic!("{e}"));
        let client = CategoryClient::new(CatalogTransport::with_client(
            reqwest::Client::new(),
            base,
        ));

        assert_eq!(
            client.raw().url(),
            &client.transport.url_for(&["categories"], None)
        );
    }
}
