//! Health check endpoint

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub location: String,
    pub connected: bool,
    pub entries: Option<i64>,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = state.uptime_seconds();
    let location = state.store().location().to_string();

    let entries = tokio::task::spawn_blocking(move || state.store().count().ok())
        .await
        .ok()
        .flatten();

    Json(HealthResponse {
        status: if entries.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        database: DatabaseHealth {
            location,
            connected: entries.is_some(),
            entries,
        },
    })
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobStore;
    use crate::db::MetadataStore;

    #[tokio::test]
    async fn health_reports_entry_count() {
        let store = MetadataStore::open_in_memory().unwrap();
        let state = AppState::new(store, BlobStore::new("unused"));

        let Json(body) = health(State(state.clone())).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.database.entries, Some(0));

        state.store().shutdown();
        let Json(body) = health(State(state)).await;
        assert_eq!(body.status, "degraded");
        assert!(!body.database.connected);
    }
}
