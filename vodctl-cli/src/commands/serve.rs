//! HTTP server command
//!
//! Runs the catalog API and serves the web root until Ctrl+C / SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use vodctl_server::http::run_server;
use vodctl_server::VodConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:8899)
    #[arg(long, short = 'b', env = "VODCTL_BIND")]
    pub bind: Option<SocketAddr>,

    /// Largest accepted request body in bytes
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(config: VodConfig) -> Result<()> {
    tracing::info!(
        bind = %config.server.bind,
        database = %config.database.location(),
        www = %config.storage.www_root.display(),
        "starting vodctl server"
    );

    run_server(&config).await.context("Server error")?;
    Ok(())
}
