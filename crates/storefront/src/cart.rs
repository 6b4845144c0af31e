//! Session cart.
//!
//! The cart is an ordered list of products held in a `tokio::sync::watch`
//! channel. Every mutation replaces or modifies the list in one step, so a
//! reader always sees a settled cart. The total is never stored: it is summed
//! from the list on every read.
//!
//! There is exactly one `CartStore` per session. Construct it at startup and
//! hand clones (they share state) to whoever needs it.

use std::sync::Arc;

use ng_store_core::{Price, Product};
use tokio::sync::watch;
use tracing::debug;

/// Reactive session cart.
#[derive(Clone)]
pub struct CartStore {
    items: Arc<watch::Sender<Vec<Product>>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            items: Arc::new(items),
        }
    }

    /// Current items in insertion order.
    #[must_use]
    pub fn cart(&self) -> Vec<Product> {
        self.items.borrow().clone()
    }

    /// Sum of the current item prices. Not clamped, not rounded.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.borrow().iter().map(|p| p.price).sum()
    }

    /// Number of items (duplicates counted).
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.borrow().len()
    }

    /// Append a product. No de-duplication, no quantity merging.
    pub fn add_to_cart(&self, product: Product) {
        debug!(product_id = %product.id, price = %product.price, "Adding product to cart");
        self.items.send_modify(|items| items.push(product));
    }

    /// Replace the whole cart in one step.
    pub fn set(&self, items: Vec<Product>) {
        self.items.send_replace(items);
    }

    /// Items and total read from the same cart state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_items(&self.items.borrow())
    }

    /// Display summary of the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(&self.snapshot())
    }

    /// Observe cart changes.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            rx: self.items.subscribe(),
        }
    }
}

/// Consistent view of the cart at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<Product>,
    pub total: Price,
}

impl CartSnapshot {
    fn from_items(items: &[Product]) -> Self {
        Self {
            items: items.to_vec(),
            total: items.iter().map(|p| p.price).sum(),
        }
    }
}

/// Receiver side of [`CartStore::subscribe`].
///
/// Intermediate states may be skipped when several mutations land before the
/// subscriber polls; the snapshot it wakes up with is always the latest one.
pub struct CartSubscription {
    rx: watch::Receiver<Vec<Product>>,
}

impl CartSubscription {
    /// Wait for the next change and return the cart as it is now.
    ///
    /// Returns `None` once every `CartStore` handle has been dropped.
    pub async fn changed(&mut self) -> Option<CartSnapshot> {
        self.rx.changed().await.ok()?;
        Some(CartSnapshot::from_items(&self.rx.borrow_and_update()))
    }

    /// The cart as it is now, without waiting.
    #[must_use]
    pub fn current(&self) -> CartSnapshot {
        CartSnapshot::from_items(&self.rx.borrow())
    }
}

// =============================================================================
// Display Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub title: String,
    pub price: String,
    /// First product image, or an empty string.
    pub image: String,
}

/// Cart display data (header badge and side panel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub items: Vec<CartItemView>,
    pub item_count: usize,
    pub total: Price,
}

impl CartSummary {
    /// Label shown under the cart items, e.g. `Total: 30`.
    #[must_use]
    pub fn total_label(&self) -> String {
        format!("Total: {}", self.total)
    }
}

impl From<&Product> for CartItemView {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            image: product.first_image().unwrap_or_default().to_string(),
        }
    }
}

impl From<&CartSnapshot> for CartSummary {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot.items.iter().map(CartItemView::from).collect(),
            item_count: snapshot.items.len(),
            total: snapshot.total,
        }
    }
}
