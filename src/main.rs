//! Ollama response-normalizing reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──POST /──▶ ┌──────────────────────────────┐ ──POST──▶ Backend
//!                        │  http::server (axum router)  │          (Ollama)
//!                        │  http::forward (reqwest)     │
//!     Client ◀──JSON──── │  http::response (normalize)  │ ◀──JSON──
//!                        └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use ollama_proxy::config::{self, ConfigError, ConfigOverrides, ProxyConfig};
use ollama_proxy::lifecycle::{wait_for_termination, Shutdown};
use ollama_proxy::observability::init_logging;
use ollama_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "ollama-proxy")]
#[command(about = "Reverse proxy that normalizes list-valued Ollama responses", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 0.0.0.0:8080).
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the backend URL (e.g. http://127.0.0.1:11434).
    #[arg(long)]
    backend: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let overrides = ConfigOverrides {
            bind_address: self.bind,
            backend_url: self.backend,
        };
        config::load_with_overrides(self.config.as_deref(), overrides)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    init_logging(&config.observability)?;

    tracing::info!("ollama-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.url,
        timeout_secs = ?config.backend.timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
