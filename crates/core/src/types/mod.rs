//! Core types for Ng Store.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod catalog;
pub mod id;
pub mod metadata;
pub mod price;

pub use catalog::{Category, Product};
pub use id::*;
pub use metadata::PageMetadata;
pub use price::Price;
