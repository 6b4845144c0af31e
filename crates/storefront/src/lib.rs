//! Ng Store storefront library.
//!
//! Catalog API clients, the session cart, page metadata synchronization and
//! the product-detail view coordinator. Rendering is left to the caller; this
//! crate owns the state and the I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod meta;
pub mod product_detail;
pub mod state;
