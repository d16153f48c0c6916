//! vodctl CLI - media catalog service and offline catalog tooling
//!
//! - `serve`: run the HTTP catalog API and static web root
//! - `list` / `search` / `show`: read the catalog database directly
//! - `remove`: delete an entry and its uploaded files

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::Overrides;
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "vodctl",
    author,
    version,
    about = "Media catalog service: upload, list, search and delete video entries"
)]
struct Cli {
    /// TOML config file
    #[arg(long, short = 'c', global = true, env = "VODCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog database file (`:memory:` for a throwaway catalog)
    #[arg(long, global = true, env = "VODCTL_DB")]
    db: Option<PathBuf>,

    /// Web root holding the front-end and the video/ and image/ blobs
    #[arg(long, global = true, env = "VODCTL_WWW")]
    www: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// List every catalog entry
    List(commands::catalog::ListArgs),
    /// List entries whose name contains a substring
    Search(commands::catalog::SearchArgs),
    /// Print one entry as JSON
    Show(commands::catalog::ShowArgs),
    /// Delete an entry and its video/image files
    Remove(commands::catalog::RemoveArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    let mut overrides = Overrides {
        db: cli.db,
        www: cli.www,
        ..Overrides::default()
    };
    if let Commands::Serve(args) = &cli.command {
        overrides.bind = args.bind;
        overrides.max_upload_bytes = args.max_upload_bytes;
    }
    let config = config::resolve(cli.config.as_deref(), overrides)?;

    match cli.command {
        Commands::Serve(_) => commands::run_serve(config).await?,
        Commands::List(args) => commands::run_list(&config, args)?,
        Commands::Search(args) => commands::run_search(&config, args)?,
        Commands::Show(args) => commands::run_show(&config, args)?,
        Commands::Remove(args) => commands::run_remove(&config, args)?,
    }
    Ok(())
}
