//! HTTP transport shared by all catalog clients.
//!
//! Builds `{api_url}/api/v1/{segments...}?{query}` URLs, sends exactly one
//! request per call and decodes the JSON body. Non-success statuses become
//! [`CatalogError::Status`] carrying the canonical status text.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, error, info_span, warn};
use url::Url;
use uuid::Uuid;

use crate::catalog::CatalogError;
use crate::config::StorefrontConfig;

/// Path prefix of every catalog endpoint.
pub const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Query parameters
// =============================================================================

/// Ordered query parameters.
///
/// Keys are given in their Rust (`snake_case`) form and translated to wire
/// names with [`wire_name`]. Entries whose value is `None` are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<String>)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping insertion order.
    #[must_use]
    pub fn with(mut self, key: &str, value: Option<impl Into<String>>) -> Self {
        self.entries.push((key.to_string(), value.map(Into::into)));
        self
    }

    /// Present entries as `(wire_name, value)` pairs in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (String, &str)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (wire_name(key), v)))
    }

    /// Whether no entry carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}

/// Translate a `snake_case` key to its camelCase wire name
/// (`category_id` → `categoryId`).
#[must_use]
pub fn wire_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Join the API base URL, the `/api/v1` prefix and path segments.
///
/// Segments are percent-encoded, so a slug can never escape its path slot.
#[must_use]
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(API_PREFIX).extend(segments);
    }
    url
}

// =============================================================================
// CatalogTransport
// =============================================================================

/// HTTP transport for the catalog API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogTransport {
    inner: Arc<CatalogTransportInner>,
}

struct CatalogTransportInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogTransport {
    /// Create a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, config.api_url.clone()))
    }

    /// Create a transport around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            inner: Arc::new(CatalogTransportInner { client, base_url }),
        }
    }

    /// The configured API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The configured HTTP client.
    #[must_use]
    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Build the final URL for an endpoint.
    #[must_use]
    pub fn url_for(&self, segments: &[&str], query: Option<&QueryParams>) -> Url {
        let mut url = endpoint_url(&self.inner.base_url, segments);

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.pairs() {
                pairs.append_pair(&key, value);
            }
        }

        url
    }

    /// Send one request and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Network`] if no response was received
    /// - [`CatalogError::Status`] for any non-2xx status
    /// - [`CatalogError::Decode`] if a 2xx body does not decode into `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<&QueryParams>,
    ) -> Result<T, CatalogError> {
        let url = self.url_for(segments, query);
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "catalog_request",
            method = %method,
            url = %url,
            request_id = %request_id,
        );

        self.send(method, url, request_id).instrument(span).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        request_id: String,
    ) -> Result<T, CatalogError> {
        let response = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Catalog request failed before a response");
                CatalogError::Network(e)
            })?;

        let status = response.status();
        debug!(status = %status, "Catalog response received");

        if !status.is_success() {
            let message = status
                .canonical_reason()
                .map_or_else(|| status.as_str().to_string(), str::to_string);
            warn!(status = %status, "Catalog API returned non-success status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            warn!(status = %status, error = %e, "Catalog response body was cut short");
            CatalogError::Decode {
                status: status.as_u16(),
                message: e.to_string(),
            }
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            error!(
                error = %e,
                body = %String::from_utf8_lossy(&body).chars().take(500).collect::<String>(),
                "Failed to decode catalog response"
            );
            CatalogError::Decode {
                status: status.as_u16(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> CatalogTransport {
        let base = Url::parse(base).unwrap_or_else(|e| panic!("bad test url {base}: {e}"));
        CatalogTransport::with_client(reqwest::Client::new(), base)
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("category_id"), "categoryId");
        assert_eq!(wire_name("category_slug"), "categorySlug");
        assert_eq!(wire_name("limit"), "limit");
        assert_eq!(wire_name("price_min_value"), "priceMinValue");
        assert_eq!(wire_name("_private"), "private");
    }

    #[test]
    fn test_url_without_query() {
        let t = transport("https://api.escuelajs.co");
        assert_eq!(
            t.url_for(&["products"], None).as_str(),
            "https://api.escuelajs.co/api/v1/products"
        );
    }

    #[test]
    fn test_base_url_with_path_and_trailing_slash() {
        let t = transport("http://localhost:8080/catalog/");
        assert_eq!(
            t.url_for(&["categories"], None).as_str(),
            "http://localhost:8080/catalog/api/v1/categories"
        );
    }

    #[test]
    fn test_empty_query_adds_no_question_mark() {
        let t = transport("https://api.escuelajs.co");
        let query = QueryParams::new()
            .with("category_id", None::<String>)
            .with("category_slug", None::<String>);

        assert_eq!(
            t.url_for(&["products"], Some(&query)),
            t.url_for(&["products"], None)
        );
    }

    #[test]
    fn test_query_keeps_insertion_order_and_wire_names() {
        let t = transport("https://api.escuelajs.co");
        let query = QueryParams::new()
            .with("category_id", Some("123"))
            .with("category_slug", Some("electronics"));

        assert_eq!(
            t.url_for(&["products"], Some(&query)).as_str(),
            "https://api.escuelajs.co/api/v1/products?categoryId=123&categorySlug=electronics"
        );
    }

    #[test]
    fn test_query_skips_absent_entries() {
        let t = transport("https://api.escuelajs.co");
        let query = QueryParams::new()
            .with("category_id", None::<String>)
            .with("category_slug", Some("electronics"));

        assert_eq!(
            t.url_for(&["products"], Some(&query)).as_str(),
            "https://api.escuelajs.co/api/v1/products?categorySlug=electronics"
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let t = transport("https://api.escuelajs.co");
        assert_eq!(
            t.url_for(&["products", "slug", "a/b c"], None).as_str(),
            "https://api.escuelajs.co/api/v1/products/slug/a%2Fb%20c"
        );
    }
}
