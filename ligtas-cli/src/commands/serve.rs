//! HTTP server command
//!
//! Flags override `~/.ligtas/config.toml` and environment values.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ligtas_server::{create_pool_with_options, run_server, ServerConfig};

use super::{load_config, load_predictor};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default from config: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL, e.g. sqlite://ligtas.db
    #[arg(long)]
    pub database_url: Option<String>,

    /// Path to the JSON-exported classifier
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = load_config()?;
    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?,
    };
    let database_url = args.database_url.unwrap_or(config.database.url);
    let model_path = args.model.unwrap_or(config.model.path);

    // Model loads once, before anything listens
    let predictor = load_predictor(&model_path)?;

    tracing::info!("Starting ligtas server on {}", bind_addr);

    let pool = create_pool_with_options(&database_url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
        timeout_secs: args.timeout.unwrap_or(config.server.timeout_secs),
    };

    // Run server (blocks until shutdown)
    run_server(pool, predictor, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
