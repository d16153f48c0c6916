//! Catalog workflows spanning the metadata store and blob storage
//!
//! The two resources share no transaction, so ordering carries the
//! consistency:
//! - publish: write both blobs, then insert the row; undo the blobs if the
//!   insert fails. Blob writes never replace an existing file, so the undo
//!   only ever touches files this upload created
//! - remove: read the row, delete it, then delete the blobs it pointed at

use tracing::{info, warn};

use crate::blob::{BlobKind, BlobStore};
use crate::db::MetadataStore;
use crate::error::CatalogError;
use crate::models::{Entry, NewEntry};

/// One uploaded file
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A complete upload: metadata plus both payloads
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub description: String,
    pub video: UploadedFile,
    pub image: UploadedFile,
}

/// Store an upload's blobs and record it in the catalog.
pub fn publish(
    store: &MetadataStore,
    blobs: &BlobStore,
    upload: Upload,
) -> Result<NewEntry, CatalogError> {
    let entry = NewEntry::new(
        upload.name.as_str(),
        upload.description,
        BlobStore::blob_path(BlobKind::Video, &upload.name, &upload.video.file_name),
        BlobStore::blob_path(BlobKind::Image, &upload.name, &upload.image.file_name),
    );
    // Nothing touches disk for an entry the store would refuse.
    entry.validate()?;

    blobs
        .write(&entry.video_path, &upload.video.bytes)
        .map_err(|source| CatalogError::BlobWrite {
            kind: "video",
            source,
        })?;

    if let Err(source) = blobs.write(&entry.image_path, &upload.image.bytes) {
        discard(blobs, &[entry.video_path.as_str()]);
        return Err(CatalogError::BlobWrite {
            kind: "image",
            source,
        });
    }

    if let Err(e) = store.insert(&entry) {
        discard(blobs, &[entry.video_path.as_str(), entry.image_path.as_str()]);
        return Err(CatalogError::Insert(e));
    }

    info!(name = %entry.name, video = %entry.video_path, image = %entry.image_path, "entry published");
    Ok(entry)
}

/// Delete entry `id` and its blobs. Returns the removed entry.
///
/// Blob removal failures are logged; the row is already gone by then.
pub fn remove(store: &MetadataStore, blobs: &BlobStore, id: i64) -> Result<Entry, CatalogError> {
    let entry = store.get_one(id).map_err(CatalogError::Lookup)?;
    store.delete(id).map_err(CatalogError::Delete)?;
    discard(blobs, &[entry.video_path.as_str(), entry.image_path.as_str()]);

    info!(id, name = %entry.name, "entry removed");
    Ok(entry)
}

fn discard(blobs: &BlobStore, paths: &[&str]) {
    for path in paths {
        if let Err(e) = blobs.remove(path) {
            warn!(path = %path, error = %e, "failed to remove blob");
        }
    }
}
