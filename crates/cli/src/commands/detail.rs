//! Product-detail command.

use ng_store_storefront::error::Result;
use ng_store_storefront::product_detail::{DetailState, RelatedRegion, RelatedState};
use ng_store_storefront::state::AppState;
use tracing::{info, warn};

use crate::commands::catalog::log_product;

/// Load the product-detail view for `slug`, print the synchronized document
/// head and, when asked, fire and load the related-products region.
///
/// Ctrl-C tears the view down and abandons any fetch in flight.
///
/// # Errors
///
/// Returns an error if the product cannot be loaded.
pub async fn run(state: &AppState, slug: &str, related: bool) -> Result<()> {
    let mut detail = state.product_detail(slug);

    let teardown = detail.teardown_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            teardown.teardown();
        }
    });

    detail.load().await;

    if detail.is_torn_down() {
        warn!(slug = %slug, "Interrupted");
        interrupt.abort();
        return Ok(());
    }

    if let Some(product) = detail.product() {
        log_product(product);
    }
    if let Some(gallery) = detail.gallery() {
        info!(images = gallery.images().len(), cover = %gallery.cover(), "Gallery");
    }

    for line in state.metadata().head().snapshot().render_html().lines() {
        info!("{line}");
    }

    if related
        && detail.trigger_related()
        && let RelatedRegion::Shown(view) = detail.load_related().await
    {
        match view.state() {
            RelatedState::Loaded(products) => {
                info!(count = products.len(), "Related products");
                for product in products {
                    log_product(product);
                }
            }
            RelatedState::Failed(e) => warn!(error = %e, "Related products unavailable"),
            RelatedState::Loading => {}
        }
    }

    interrupt.abort();

    match detail.into_state() {
        DetailState::Failed(e) => Err(e.into()),
        DetailState::Loading | DetailState::Loaded(_) => Ok(()),
    }
}
