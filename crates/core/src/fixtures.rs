//! Deterministic sample catalog data.
//!
//! Enabled for this crate's tests and, through the `fixtures` feature, for
//! the tests of downstream crates.

use chrono::{DateTime, Utc};

use crate::types::{Category, CategoryId, Price, Product, ProductId};

/// A category named after its id.
#[must_use]
pub fn category(id: i64) -> Category {
    Category {
        id: CategoryId::new(id),
        name: format!("Category {id}"),
        image: format!("https://placehold.co/600x400?text=category-{id}"),
        slug: format!("category-{id}"),
    }
}

/// A product named after its id, with two images and the given price.
#[must_use]
pub fn product(id: i64, price: Price) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price,
        description: format!("Description of product {id}"),
        images: vec![
            format!("https://placehold.co/600x400?text=product-{id}-a"),
            format!("https://placehold.co/600x400?text=product-{id}-b"),
        ],
        creation_at: DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
        category: category(1),
        slug: format!("product-{id}"),
    }
}

/// A product with an explicit image list.
#[must_use]
pub fn product_with_images(id: i64, images: &[&str]) -> Product {
    Product {
        images: images.iter().map(|url| (*url).to_string()).collect(),
        ..product(id, Price::from(10))
    }
}
