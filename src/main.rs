//! Alkosto catalog extraction tool.
//!
//! A command-line tool for extracting product listings from alkosto.com
//! and persisting them to flat files for price comparison.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alkosto_scraper::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "alkosto_scraper=info"
    } else {
        "alkosto_scraper=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
