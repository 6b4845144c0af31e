//! Product endpoints.

use std::future::Future;

use ng_store_core::{Product, ProductId};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::transport::{CatalogTransport, QueryParams};
use crate::catalog::CatalogError;

/// Optional filters for product listings.
///
/// An absent filter set and an empty one build the identical request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    pub category_id: Option<String>,
    pub category_slug: Option<String>,
}

impl ProductFilters {
    #[must_use]
    pub fn by_category_id(id: impl Into<String>) -> Self {
        Self {
            category_id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_category_slug(slug: impl Into<String>) -> Self {
        Self {
            category_slug: Some(slug.into()),
            ..Self::default()
        }
    }

    /// Query parameters in wire order: `categoryId`, then `categorySlug`.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("category_id", self.category_id.clone())
            .with("category_slug", self.category_slug.clone())
    }
}

/// Source of products for the product-detail view.
pub trait ProductSource {
    /// Fetch one product by slug.
    fn get_one_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Fetch the products related to a slug. An empty list is a valid result.
    fn get_related_products(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Client for the product endpoints.
#[derive(Clone)]
pub struct ProductClient {
    transport: CatalogTransport,
}

impl ProductClient {
    #[must_use]
    pub const fn new(transport: CatalogTransport) -> Self {
        Self { transport }
    }

    /// List products, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        filters: Option<&ProductFilters>,
    ) -> Result<Vec<Product>, CatalogError> {
        let query = filters.map(ProductFilters::to_query);
        self.transport
            .request(Method::GET, &["products"], query.as_ref())
            .await
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_one(&self, id: ProductId) -> Result<Product, CatalogError> {
        let id = id.to_string();
        self.transport
            .request(Method::GET, &["products", &id], None)
            .await
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_one_by_slug(&self, slug: &str) -> Result<Product, CatalogError> {
        self.transport
            .request(Method::GET, &["products", "slug", slug], None)
            .await
    }

    /// Get the products related to a slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_related_products(&self, slug: &str) -> Result<Vec<Product>, CatalogError> {
        self.transport
            .request(Method::GET, &["products", "slug", slug, "related"], None)
            .await
    }
}

impl ProductSource for ProductClient {
    async fn get_one_by_slug(&self, slug: &str) -> Result<Product, CatalogError> {
        Self::get_one_by_slug(self, slug).await
    }

    async fn get_related_products(&self, slug: &str) -> Result<Vec<Product>, CatalogError> {
        Self::get_related_products(self, slug).await
    }
}
