//! Error types for vodctl-server
//!
//! The store and blob collaborators return these; the HTTP layer maps them
//! onto status codes in [`crate::http::ApiError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ValidationError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Metadata store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database session could not be established. Fatal at startup.
    #[error("failed to connect to database at {location}: {source}")]
    Connection {
        location: String,
        #[source]
        source: ConnectError,
    },

    /// A submitted statement failed. Carries the driver's error text.
    #[error("statement failed: {0}")]
    Statement(#[from] rusqlite::Error),

    /// A single-row lookup matched zero rows (or, defensively, more than one)
    #[error("entry {id} not found")]
    NotFound { id: i64 },

    /// Input rejected before any database interaction
    #[error("invalid entry: {0}")]
    Validation(#[from] ValidationError),

    /// The session was shut down
    #[error("database connection is closed")]
    Closed,
}

/// Why a session could not be opened
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("could not create database directory: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Blob storage failures
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("path {path:?} escapes the storage root")]
    InvalidPath { path: String },

    #[error("{path} already exists")]
    Exists { path: String },
}

/// Failures of the workflows that touch both rows and blobs
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to store {kind} file: {source}")]
    BlobWrite {
        kind: &'static str,
        #[source]
        source: BlobError,
    },

    #[error("failed to add entry: {0}")]
    Insert(#[source] StoreError),

    #[error("failed to look up entry: {0}")]
    Lookup(#[source] StoreError),

    #[error("failed to delete entry: {0}")]
    Delete(#[source] StoreError),
}

/// Startup and serving failures
#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}
