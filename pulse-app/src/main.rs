//! LivePulse client - Main entry point
//!
//! Fetches live-event announcements for followed artists from the
//! backend, renders timeline/calendar projections, and manages the
//! watchlist with optimistic mutations.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_app::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_app=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Args::parse();

    info!("Starting LivePulse client v{}", env!("CARGO_PKG_VERSION"));

    cli::run(args).await
}
