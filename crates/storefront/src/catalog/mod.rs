//! Catalog API clients.
//!
//! # Architecture
//!
//! - [`CatalogTransport`] is the single HTTP seam: URL and query construction,
//!   status checking and JSON decoding. It never retries or swallows errors.
//! - [`ProductClient`] and [`CategoryClient`] are thin, read-only wrappers that
//!   name the endpoints.
//! - [`CategoryClient::get_all_raw`] is a second category fetch path that goes
//!   around the transport and does not check the HTTP status.
//!
//! Every call is a single request/response; nothing is cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use ng_store_storefront::catalog::{CatalogTransport, ProductClient, ProductFilters};
//!
//! let transport = CatalogTransport::new(&config)?;
//! let products = ProductClient::new(transport.clone());
//!
//! let shoes = products
//!     .get_products(Some(&ProductFilters::by_category_slug("shoes")))
//!     .await?;
//! let detail = products.get_one_by_slug("classic-red-sneakers").await?;
//! ```

mod categories;
mod products;
mod transport;

pub use categories::{CategoryClient, CategoryFetcher, RawCategories, RawCategoryFetcher};
pub use products::{ProductClient, ProductFilters, ProductSource};
pub use transport::{API_PREFIX, CatalogTransport, QueryParams, REQUEST_ID_HEADER, wire_name};

use thiserror::Error;

/// Errors from catalog calls made through [`CatalogTransport`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Status text (e.g., "Not Found").
        message: String,
    },

    /// The request never produced a response (connection, timeout, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body could not be read or did not match the
    /// expected shape.
    #[error("Decode error (HTTP {status}): {message}")]
    Decode {
        /// HTTP status code of the response.
        status: u16,
        /// Decoder error message.
        message: String,
    },
}

impl CatalogError {
    /// HTTP status of the failed call; `0` when no response was received.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => *status,
            Self::Network(e) => e.status().map_or(0, |s| s.as_u16()),
        }
    }

    /// Human-readable message for the failure.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Decode { message, .. } => message.clone(),
            Self::Network(e) => e.to_string(),
        }
    }

    /// Whether the API reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Errors from [`RawCategoryFetcher`].
///
/// Both variants display the underlying error message verbatim. The HTTP
/// status is never a cause.
#[derive(Debug, Clone, Error)]
pub enum RawFetchError {
    /// The request itself failed.
    #[error("{0}")]
    Network(String),

    /// The body was not valid JSON.
    #[error("{0}")]
    Json(String),
}
