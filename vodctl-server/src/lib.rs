//! vodctl-server: media catalog service
//!
//! Uploaded video/image pairs live as files under a web root; their
//! metadata lives in one SQLite table reached through a single shared
//! connection. The HTTP layer exposes catalog CRUD and search and serves
//! the web root statically.

pub mod blob;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod state;

pub use blob::BlobStore;
pub use config::VodConfig;
pub use db::{ConnectionManager, DatabaseLocation, MetadataStore};
pub use error::{BlobError, CatalogError, ServeError, StoreError, StoreResult};
pub use models::{Entry, EntryUpdate, NewEntry};
pub use state::AppState;
