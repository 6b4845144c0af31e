//! Cart command.

use ng_store_storefront::error::{Result, add_breadcrumb};
use ng_store_storefront::state::AppState;
use tracing::info;

/// Fetch each product by slug, add it to the session cart and print the
/// cart summary.
///
/// # Errors
///
/// Returns an error on the first product that cannot be fetched. Products
/// added before the failure stay in the cart.
pub async fn run(state: &AppState, slugs: &[String]) -> Result<()> {
    let cart = state.cart();

    for slug in slugs {
        let product = state.products().get_one_by_slug(slug).await?;
        add_breadcrumb("cart", "Added product to cart", Some(&[("slug", slug.as_str())]));
        cart.add_to_cart(product);
        info!(items = cart.count(), total = %cart.total(), "Cart updated");
    }

    let summary = cart.summary();

    info!(items = summary.item_count, "My Cart");
    for item in &summary.items {
        info!(price = %item.price, image = %item.image, "{}", item.title);
    }
    info!("{}", summary.total_label());
    Ok(())
}
