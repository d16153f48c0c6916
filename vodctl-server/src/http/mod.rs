//! HTTP server layer
//!
//! Axum server with:
//! - Catalog routes under `/video`
//! - Static file serving from the web root
//! - Request tracing
//! - Graceful shutdown
//! - JSON error envelopes

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server};
