//! Ng Store CLI - Browse a live catalog from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List categories (transport path, or the raw path that skips status checks)
//! ng-store categories
//! ng-store categories --raw
//!
//! # List products, optionally filtered
//! ng-store products --category-slug electronics
//!
//! # Fetch one product by id
//! ng-store product 4
//!
//! # Run the product-detail view and print the document head
//! ng-store detail classic-red-sneakers --related
//!
//! # Fill a cart and print its summary
//! ng-store cart classic-red-sneakers classic-blue-cap
//! ```
//!
//! Configuration comes from the environment (see `StorefrontConfig`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use ng_store_core::ProductId;
use ng_store_storefront::catalog::ProductFilters;
use ng_store_storefront::config::StorefrontConfig;
use ng_store_storefront::error::Result;
use ng_store_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ng-store")]
#[command(author, version, about = "Ng Store command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all categories
    Categories {
        /// Use the raw fetch path (no HTTP status check)
        #[arg(long)]
        raw: bool,
    },
    /// List products
    Products {
        /// Only products in this category id
        #[arg(long)]
        category_id: Option<String>,

        /// Only products in this category slug
        #[arg(long)]
        category_slug: Option<String>,
    },
    /// Fetch one product by id
    Product {
        /// Product id
        id: i64,
    },
    /// Load a product-detail view by slug
    Detail {
        /// Product slug
        slug: String,

        /// Also fire the related-products region
        #[arg(long)]
        related: bool,
    },
    /// Add products to a cart by slug and print the summary
    Cart {
        /// Product slugs, added in order
        #[arg(required = true)]
        slugs: Vec<String>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ng_store=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        e.report();
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<()> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Categories { raw } => {
            if raw {
                commands::catalog::raw_categories(&state).await?;
            } else {
                commands::catalog::categories(state.categories()).await?;
            }
        }
        Commands::Products {
            category_id,
            category_slug,
        } => {
            let filters = ProductFilters {
                category_id,
                category_slug,
            };
            commands::catalog::products(&state, &filters).await?;
        }
        Commands::Product { id } => {
            commands::catalog::product(&state, ProductId::new(id)).await?;
        }
        Commands::Detail { slug, related } => {
            commands::detail::run(&state, &slug, related).await?;
        }
        Commands::Cart { slugs } => {
            commands::cart::run(&state, &slugs).await?;
        }
    }
    Ok(())
}
