//! tnft-api - NFT metadata service
//!
//! Serves ledger NFT records enriched with serie statistics, creator/owner
//! profiles, remote descriptors and categories.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tnft_api::db::{self, SqliteCategoryDirectory, SqliteUserDirectory};
use tnft_api::enrichment::{Enricher, HttpTransport};
use tnft_api::{build_router, AppState};
use tnft_common::config::{CliOverrides, ServiceConfig, TomlConfig};
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "tnft-api")]
#[command(about = "NFT metadata enrichment service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Canonical IPFS gateway base URL
    #[arg(long)]
    ipfs_gateway: Option<String>,

    /// Remote descriptor fetch timeout in milliseconds
    #[arg(long)]
    fetch_timeout_ms: Option<u64>,

    /// Default log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            ipfs_gateway: self.ipfs_gateway.clone(),
            fetch_timeout_ms: self.fetch_timeout_ms,
            bind_addr: self.bind.clone(),
            database_path: self.database.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = match &args.config {
        Some(path) => TomlConfig::load(path)?,
        None => TomlConfig::default(),
    };
    let config = ServiceConfig::resolve(&args.overrides(), &toml_config)?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", config.log_level).into()),
        )
        .init();

    info!("Starting tnft-api v{}", env!("CARGO_PKG_VERSION"));
    info!("IPFS gateway: {}", config.enrichment.ipfs_gateway);
    info!(
        "Descriptor fetch timeout: {}ms",
        config.enrichment.fetch_timeout.as_millis()
    );
    info!("Database: {}", config.database_path.display());

    let pool = match db::init_database_pool(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let enricher = Enricher::new(
        &config.enrichment,
        Arc::new(SqliteUserDirectory::new(pool.clone())),
        Arc::new(SqliteCategoryDirectory::new(pool.clone())),
        Arc::new(HttpTransport::new()?),
    );

    let state = AppState::new(pool, Arc::new(enricher));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!("tnft-api listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
