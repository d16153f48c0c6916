//! Application state shared across handlers

use std::sync::Arc;
use std::time::Instant;

use crate::blob::BlobStore;
use crate::db::MetadataStore;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    store: MetadataStore,
    blobs: BlobStore,
    start_time: Instant,
}

impl AppState {
    pub fn new(store: MetadataStore, blobs: BlobStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                blobs,
                start_time: Instant::now(),
            }),
        }
    }

    pub fn store(&self) -> &MetadataStore {
        &self.inner.store
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.inner.blobs
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }
}
