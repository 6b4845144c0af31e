//! Ng Store Core - Shared types library.
//!
//! This crate provides the domain types used across the Ng Store components:
//! - `storefront` - Catalog clients, cart store, page metadata and product detail
//! - `cli` - Command-line front end for browsing a live catalog
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Catalog
//! entities are immutable once fetched; everything stateful lives in the
//! storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog entities and page metadata

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use types::*;
