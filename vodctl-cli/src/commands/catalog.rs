//! Offline catalog commands: inspect or prune the database without a server
//!
//! These open the same database file the server uses. SQLite serializes
//! writers, so running them next to a live server is safe but will block
//! briefly on its lock.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;

use vodctl_server::{catalog, BlobStore, Entry, MetadataStore, VodConfig};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print entries as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Substring to look for in entry names (case-insensitive for ASCII)
    pub substring: String,

    /// Print entries as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Entry id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Entry id
    pub id: i64,
}

fn open_store(config: &VodConfig) -> Result<MetadataStore> {
    let location = config.database.location();
    MetadataStore::open(location.clone())
        .with_context(|| format!("Failed to open catalog database {location}"))
}

pub fn run_list(config: &VodConfig, args: ListArgs) -> Result<()> {
    let store = open_store(config)?;
    let entries = store.get_all().context("Failed to list entries")?;
    store.shutdown();
    print_entries(&entries, args.json)
}

pub fn run_search(config: &VodConfig, args: SearchArgs) -> Result<()> {
    let store = open_store(config)?;
    let entries = store
        .search(&args.substring)
        .with_context(|| format!("Failed to search for '{}'", args.substring))?;
    store.shutdown();
    print_entries(&entries, args.json)
}

pub fn run_show(config: &VodConfig, args: ShowArgs) -> Result<()> {
    let store = open_store(config)?;
    let entry = store.get_one(args.id);
    store.shutdown();
    let entry = entry.with_context(|| format!("Failed to show entry {}", args.id))?;

    let json = serde_json::to_string_pretty(&entry)?;
    writeln!(io::stdout(), "{json}")?;
    Ok(())
}

pub fn run_remove(config: &VodConfig, args: RemoveArgs) -> Result<()> {
    let store = open_store(config)?;
    let blobs = BlobStore::new(&config.storage.www_root);
    let removed = catalog::remove(&store, &blobs, args.id);
    store.shutdown();
    let removed = removed.with_context(|| format!("Failed to remove entry {}", args.id))?;

    writeln!(io::stdout(), "removed {} ({})", removed.id, removed.name)?;
    Ok(())
}

fn print_entries(entries: &[Entry], json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(entries)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(out, "no entries")?;
        return Ok(());
    }

    let name_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    writeln!(out, "{:>6}  {:<name_width$}  VIDEO", "ID", "NAME")?;
    for entry in entries {
        writeln!(
            out,
            "{:>6}  {:<name_width$}  {}",
            entry.id, entry.name, entry.video_path
        )?;
    }
    Ok(())
}
