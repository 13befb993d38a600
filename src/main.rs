//! Shopping list server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server (request id, trace, timeout, body limit)
//!                          │
//!                          ▼
//!                      http::handlers (path id, body decode)
//!                          │
//!                          ▼
//!                      store::ShoppingStore ──▶ versioning::conditional
//!                          │                    (If-Match / If-None-Match)
//!                          ▼
//!                      commit: item → list → collection ETags
//!                          │
//!     Client Response      ▼
//!     ◀─────────────── http::response (status, ETag, Location, JSON)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use shopping_lists::config::{load_config, ServerConfig};
use shopping_lists::observability::{logging, metrics};
use shopping_lists::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "shopping-lists")]
#[command(about = "In-memory shopping list server with ETag concurrency control", long_about = None)]
struct Args {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;

    tracing::info!("shopping-lists v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.security.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    shutdown.trigger_on_os_signal();
    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
