//! Catalog listing commands.

use ng_store_core::{Category, Product, ProductId};
use ng_store_storefront::catalog::{CategoryFetcher, ProductFilters, RawCategories};
use ng_store_storefront::error::{AppError, Result};
use ng_store_storefront::state::AppState;
use tracing::{info, warn};

/// List every category through the given fetch strategy.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn categories<F>(fetcher: &F) -> Result<()>
where
    F: CategoryFetcher,
    AppError: From<F::Error>,
{
    let categories = fetcher.fetch_categories().await?;

    log_categories(&categories);
    Ok(())
}

/// List categories from the raw fetch, or log whatever other body came back.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not JSON.
pub async fn raw_categories(state: &AppState) -> Result<()> {
    match state.categories().get_all_raw().await? {
        RawCategories::List(categories) => log_categories(&categories),
        RawCategories::Other(body) => warn!(%body, "Category endpoint returned a non-list body"),
    }
    Ok(())
}

/// List products matching the filters.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn products(state: &AppState, filters: &ProductFilters) -> Result<()> {
    let products = state.products().get_products(Some(filters)).await?;

    info!(count = products.len(), "Products");
    for product in &products {
        log_product(product);
    }
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the product is not found or the API request fails.
pub async fn product(state: &AppState, id: ProductId) -> Result<()> {
    let product = state.products().get_one(id).await?;

    log_product(&product);
    info!(category = %product.category.name, "{}", product.description);
    Ok(())
}

fn log_categories(categories: &[Category]) {
    info!(count = categories.len(), "Categories");
    for category in categories {
        info!(id = %category.id, slug = %category.slug, "{}", category.name);
    }
}

pub fn log_product(product: &Product) {
    info!(
        id = %product.id,
        slug = %product.slug,
        price = %product.price,
        "{}",
        product.title
    );
}
