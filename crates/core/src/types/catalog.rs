//! Catalog entities as served by the catalog API.
//!
//! Both types mirror the wire shape (camelCase field names). Fields the API
//! sends that are not modelled here (`updatedAt`, ...) are ignored on decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product category.
///
/// Identity is `id`; `slug` is the human-readable key used for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Image URL.
    pub image: String,
    pub slug: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unvalidated; may be zero or negative.
    pub price: Price,
    pub description: String,
    /// Image URLs in display order. May be empty.
    pub images: Vec<String>,
    pub creation_at: DateTime<Utc>,
    pub category: Category,
    pub slug: String,
}

impl Product {
    /// The first image, used as the default cover and social preview.
    #[must_use]
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
