//! Application state shared across the storefront session.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{CatalogError, CatalogTransport, CategoryClient, ProductClient};
use crate::config::StorefrontConfig;
use crate::meta::{HeadState, PageMetadataSynchronizer};
use crate::product_detail::ProductDetail;

/// Application state for one storefront session.
///
/// This struct is cheaply cloneable via `Arc`; clones share the catalog
/// connection pool, the session cart and the document head.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: ProductClient,
    categories: CategoryClient,
    cart: CartStore,
    metadata: PageMetadataSynchronizer<HeadState>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let transport = CatalogTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create application state around an existing transport.
    #[must_use]
    pub fn with_transport(config: StorefrontConfig, transport: CatalogTransport) -> Self {
        let products = ProductClient::new(transport.clone());
        let categories = CategoryClient::new(transport);
        let metadata = PageMetadataSynchronizer::new(HeadState::new(), config.domain.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                categories,
                cart: CartStore::new(),
                metadata,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn products(&self) -> &ProductClient {
        &self.inner.products
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryClient {
        &self.inner.categories
    }

    /// The session cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn metadata(&self) -> &PageMetadataSynchronizer<HeadState> {
        &self.inner.metadata
    }

    /// Create a coordinator for the product-detail view of `slug`.
    #[must_use]
    pub fn product_detail(&self, slug: &str) -> ProductDetail<'_, ProductClient, HeadState> {
        ProductDetail::new(&self.inner.products, &self.inner.metadata, slug)
    }
}
