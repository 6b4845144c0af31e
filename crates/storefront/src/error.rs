//! Unified error handling with Sentry integration.
//!
//! Binaries funnel every failure into [`AppError`] and call
//! [`AppError::report`] once, which logs it and captures it to Sentry when
//! Sentry is initialized (a no-op otherwise).

use thiserror::Error;

use crate::catalog::{CatalogError, RawFetchError};
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog API call failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Raw category fetch failed.
    #[error("Category fetch error: {0}")]
    RawFetch(#[from] RawFetchError),
}

impl AppError {
    /// Whether the failure is worth an error event rather than a warning.
    ///
    /// Missing catalog resources are expected in normal browsing.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Catalog(e) => !e.is_not_found(),
            Self::Config(_) | Self::RawFetch(_) => true,
        }
    }

    /// Log the error and capture it to Sentry.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::warn!(error = %self, "Command failed");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
