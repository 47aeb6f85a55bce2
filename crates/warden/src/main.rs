//! # Warden - Wicket Gate Service
//!
//! The access-control shim for gated articles. Validates quiz answers
//! against the encrypted question catalog, throttles repeated failures
//! with a lockout window, and remembers passed gates per visitor.
//!
//! ## Architecture
//! ```text
//! Blog frontend → Warden → Redis (per-visitor state)
//!                    ↓
//!             Question Catalog (static TOML)
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod access;
mod catalog;
mod config;
mod limiter;
mod routes;
mod state;
mod store;
mod validator;

use config::AppConfig;
use state::AppState;

/// Wicket Warden - gated-content validation service
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/warden.toml")]
    config: String,

    /// Redis URL (overrides config)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Question catalog path (overrides config)
    #[arg(long, env = "CATALOG_PATH")]
    catalog: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up WICKET_ENCRYPTION_KEY and friends from .env if present
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("🚪 Starting Wicket Warden v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!("📋 Configuration loaded from {}", args.config);

    // Initialize application state (catalog, codec, store)
    let state = AppState::new(config.clone()).await?;
    info!("✅ Redis connected: {}", config.redis_url);
    info!(
        "📚 Question catalog loaded: {} set(s) from {}",
        state.catalog.len(),
        config.catalog_path
    );

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("🚀 Warden listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Warden shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("🛑 Shutdown signal received");
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
