//! Product-detail view coordination.
//!
//! A [`ProductDetail`] drives one product page:
//!
//! ```text
//! Loading ──get_one_by_slug──► Loaded ──trigger──► related region shown
//!    │                            (gallery, metadata)        │
//!    └──────── error ────────► Failed                   get_related_products
//! ```
//!
//! The owner calls [`ProductDetail::load`] once, forwards gallery clicks and
//! the single "related region is visible" trigger, and tears the view down
//! through a [`TeardownHandle`]. After teardown an in-flight fetch is dropped
//! and every operation is a no-op.

use std::sync::Arc;

use ng_store_core::{PageMetadata, Product};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::catalog::{CatalogError, ProductSource};
use crate::meta::{DocumentHead, PageMetadataSynchronizer};

// =============================================================================
// Gallery
// =============================================================================

/// Image gallery of a loaded product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    images: Vec<String>,
    cover: String,
}

impl GalleryState {
    /// Gallery whose cover starts at the first image (empty if none).
    #[must_use]
    pub fn new(images: Vec<String>) -> Self {
        let cover = images.first().cloned().unwrap_or_default();
        Self { images, cover }
    }

    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// The currently highlighted image.
    #[must_use]
    pub fn cover(&self) -> &str {
        &self.cover
    }

    /// Make `images[index]` the cover.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[allow(clippy::indexing_slicing)]
    pub fn select_image(&mut self, index: usize) {
        self.cover.clone_from(&self.images[index]);
    }
}

// =============================================================================
// Deferred region
// =============================================================================

/// One-shot trigger for a deferred region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeferredGate {
    #[default]
    Armed,
    Fired,
}

impl DeferredGate {
    /// Fire the gate. Returns `true` only on the first call.
    pub fn fire(&mut self) -> bool {
        match self {
            Self::Armed => {
                *self = Self::Fired;
                true
            }
            Self::Fired => false,
        }
    }

    #[must_use]
    pub const fn has_fired(&self) -> bool {
        matches!(self, Self::Fired)
    }
}

/// State of the related-products fetch.
#[derive(Debug, Default)]
pub enum RelatedState {
    #[default]
    Loading,
    Loaded(Vec<Product>),
    Failed(CatalogError),
}

/// Related-products view mounted when the deferred region fires.
#[derive(Debug)]
pub struct RelatedProducts {
    slug: String,
    state: RelatedState,
}

impl RelatedProducts {
    fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            state: RelatedState::Loading,
        }
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub const fn state(&self) -> &RelatedState {
        &self.state
    }

    /// Loaded products; `None` while loading or after a failure.
    #[must_use]
    pub fn products(&self) -> Option<&[Product]> {
        match &self.state {
            RelatedState::Loaded(products) => Some(products),
            _ => None,
        }
    }

    async fn load<S: ProductSource>(&mut self, source: &S, teardown: &watch::Receiver<bool>) {
        if !matches!(self.state, RelatedState::Loading) {
            return;
        }

        let Some(result) = until_teardown(teardown, source.get_related_products(&self.slug)).await
        else {
            debug!(slug = %self.slug, "View torn down; related fetch abandoned");
            return;
        };

        self.state = match result {
            Ok(products) => {
                debug!(slug = %self.slug, count = products.len(), "Related products loaded");
                RelatedState::Loaded(products)
            }
            Err(e) => {
                warn!(slug = %self.slug, error = %e, "Failed to load related products");
                RelatedState::Failed(e)
            }
        };
    }
}

/// The deferred related-products region.
#[derive(Debug, Default)]
pub enum RelatedRegion {
    /// Not triggered yet; nothing rendered or fetched.
    #[default]
    Pending,
    Shown(RelatedProducts),
}

// =============================================================================
// Teardown
// =============================================================================

/// Lets the owner of a view tear it down, possibly from another task.
#[derive(Clone)]
pub struct TeardownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.tx.send_replace(true);
    }
}

/// Run `fut` unless the view is (or gets) torn down first.
async fn until_teardown<F: Future>(teardown: &watch::Receiver<bool>, fut: F) -> Option<F::Output> {
    let mut teardown = teardown.clone();
    tokio::select! {
        biased;
        _ = teardown.wait_for(|down| *down) => None,
        output = fut => Some(output),
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// A successfully fetched product with its gallery.
#[derive(Debug)]
pub struct LoadedProduct {
    pub product: Product,
    pub gallery: GalleryState,
}

/// Main product state of the view.
#[derive(Debug, Default)]
pub enum DetailState {
    #[default]
    Loading,
    Loaded(Box<LoadedProduct>),
    Failed(CatalogError),
}

/// Coordinator for one product-detail view.
pub struct ProductDetail<'a, S, H> {
    source: &'a S,
    metadata: &'a PageMetadataSynchronizer<H>,
    slug: String,
    state: DetailState,
    gate: DeferredGate,
    related: RelatedRegion,
    teardown_tx: Arc<watch::Sender<bool>>,
    teardown_rx: watch::Receiver<bool>,
}

impl<'a, S: ProductSource, H: DocumentHead> ProductDetail<'a, S, H> {
    #[must_use]
    pub fn new(
        source: &'a S,
        metadata: &'a PageMetadataSynchronizer<H>,
        slug: impl Into<String>,
    ) -> Self {
        let (teardown_tx, teardown_rx) = watch::channel(false);
        Self {
            source,
            metadata,
            slug: slug.into(),
            state: DetailState::Loading,
            gate: DeferredGate::Armed,
            related: RelatedRegion::Pending,
            teardown_tx: Arc::new(teardown_tx),
            teardown_rx,
        }
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        match &self.state {
            DetailState::Loaded(loaded) => Some(&loaded.product),
            _ => None,
        }
    }

    #[must_use]
    pub fn gallery(&self) -> Option<&GalleryState> {
        match &self.state {
            DetailState::Loaded(loaded) => Some(&loaded.gallery),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&CatalogError> {
        match &self.state {
            DetailState::Failed(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub const fn related(&self) -> &RelatedRegion {
        &self.related
    }

    /// Consume the view, keeping only its product state.
    #[must_use]
    pub fn into_state(self) -> DetailState {
        self.state
    }

    #[must_use]
    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle {
            tx: Arc::clone(&self.teardown_tx),
        }
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        *self.teardown_rx.borrow()
    }

    /// Fetch the product and settle into `Loaded` or `Failed`.
    ///
    /// Only the first call in `Loading` fetches; failures are not retried.
    #[instrument(skip(self), fields(slug = %self.slug))]
    pub async fn load(&mut self) -> &DetailState {
        if self.is_torn_down() || !matches!(self.state, DetailState::Loading) {
            return &self.state;
        }

        let Some(result) =
            until_teardown(&self.teardown_rx, self.source.get_one_by_slug(&self.slug)).await
        else {
            debug!("View torn down; product fetch abandoned");
            return &self.state;
        };

        match result {
            Ok(product) => {
                self.metadata.update_meta_tags(&self.page_metadata(&product));
                let gallery = GalleryState::new(product.images.clone());
                debug!(product_id = %product.id, images = gallery.images().len(), "Product loaded");
                self.state = DetailState::Loaded(Box::new(LoadedProduct { product, gallery }));
            }
            Err(e) => {
                warn!(status = e.status(), error = %e, "Failed to load product");
                self.state = DetailState::Failed(e);
            }
        }

        &self.state
    }

    /// Select a gallery image. No-op unless loaded and live.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the product's images.
    pub fn select_image(&mut self, index: usize) {
        if self.is_torn_down() {
            return;
        }
        if let DetailState::Loaded(loaded) = &mut self.state {
            loaded.gallery.select_image(index);
        }
    }

    /// Fire the related-products trigger.
    ///
    /// Returns `true` if this call mounted the region. Ignored before the
    /// product has loaded, after teardown, and on every call after the first.
    pub fn trigger_related(&mut self) -> bool {
        if self.is_torn_down() || !matches!(self.state, DetailState::Loaded(_)) {
            return false;
        }
        if !self.gate.fire() {
            return false;
        }

        debug!(slug = %self.slug, "Related region triggered");
        self.related = RelatedRegion::Shown(RelatedProducts::new(&self.slug));
        true
    }

    /// Fetch the related products of a shown region.
    pub async fn load_related(&mut self) -> &RelatedRegion {
        if self.is_torn_down() {
            return &self.related;
        }
        if let RelatedRegion::Shown(view) = &mut self.related {
            view.load(self.source, &self.teardown_rx).await;
        }
        &self.related
    }

    fn page_metadata(&self, product: &Product) -> PageMetadata {
        let domain = self.metadata.defaults().url.trim_end_matches('/');
        let mut meta = PageMetadata::titled(&product.title)
            .with_description(&product.description)
            .with_url(format!("{domain}/product/{}", self.slug));
        if let Some(image) = product.first_image() {
            meta = meta.with_image(image);
        }
        meta
    }
}
