//! Axum server setup
//!
//! Server skeleton with:
//! - Catalog routes plus static files from the web root
//! - Upload body limit
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, then the database session closes

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::blob::BlobStore;
use crate::config::VodConfig;
use crate::db::MetadataStore;
use crate::error::ServeError;
use crate::state::AppState;

/// Build the application router.
///
/// Anything no route claims is served from the web root, which covers
/// the front-end and the uploaded blobs.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let static_files = ServeDir::new(state.blobs().root());

    Router::new()
        .merge(routes::health::router())
        .merge(routes::videos::router())
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store, prepare blob storage and serve until a shutdown signal.
///
/// A store that cannot be opened is returned as an error before anything
/// binds; the caller is expected to exit.
pub async fn run_server(config: &VodConfig) -> Result<(), ServeError> {
    let store = MetadataStore::open(config.database.location())?;
    let blobs = BlobStore::new(&config.storage.www_root);
    blobs.bootstrap()?;

    serve(store, blobs, config).await
}

async fn serve(store: MetadataStore, blobs: BlobStore, config: &VodConfig) -> Result<(), ServeError> {
    let state = AppState::new(store.clone(), blobs);
    let app = build_router(state, config.server.max_upload_bytes);

    let listener = TcpListener::bind(config.server.bind).await?;
    tracing::info!(
        addr = %config.server.bind,
        www = %config.storage.www_root.display(),
        "server listening"
    );

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.shutdown();
    tracing::info!("server shutdown complete");
    result.map_err(ServeError::from)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
