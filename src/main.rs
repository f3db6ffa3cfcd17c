//! Midway API server
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum (fallback) ──▶ Dispatcher
//!                                           │
//!                        CORS ─ body ─ identity ─ route table
//!                                           │
//!                                           ▼
//!                                   handler (gated by
//!                                   require_auth / require_role)
//!                                           │
//!     Client Response                       ▼
//!     ◀────────────── Reply → JSON + CORS headers + access log
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use midway::api;
use midway::config::{resolve_config, Overrides};
use midway::http::HttpServer;
use midway::lifecycle::Shutdown;
use midway::observability::{logging, metrics};
use midway::routing::Router;
use midway::security::StaticTokens;

#[derive(Debug, Parser)]
#[command(name = "midway", version, about = "Path-routed JSON API server")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "MIDWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Comma-separated list of allowed CORS origins
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origins: Option<String>,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = Overrides {
        port: cli.port,
        cors_origins: cli.cors_origins,
        max_body_bytes: cli.max_body_bytes,
        log_level: cli.log_level,
    };
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "midway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        max_body_bytes = config.http.max_body_bytes,
        request_timeout_secs = config.http.request_timeout_secs,
        cors_origins = config.cors.allowed_origins.as_deref().unwrap_or("*"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // validated at load time
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let tokens = StaticTokens::from_config(&config.auth);
    if tokens.is_empty() {
        tracing::warn!("No bearer tokens configured; every request is anonymous");
    }

    let mut router = Router::new();
    api::register(&mut router)?;

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, router, Arc::new(tokens));
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
