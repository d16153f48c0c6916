//! Blob storage - video and cover image files under the web root
//!
//! Layout:
//! ```text
//! <www>/
//!   index.html ...        front-end, served as-is
//!   video/<name><file>    uploaded videos
//!   image/<name><file>    uploaded cover images
//! ```
//!
//! Entries record paths relative to the web root (`/video/...`), which is
//! also the URL the static file service exposes them under.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::BlobError;

pub const VIDEO_DIR: &str = "video";
pub const IMAGE_DIR: &str = "image";

/// Which of an entry's two blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Video,
    Image,
}

impl BlobKind {
    fn dir(self) -> &'static str {
        match self {
            Self::Video => VIDEO_DIR,
            Self::Image => IMAGE_DIR,
        }
    }
}

/// Filesystem tree that holds uploaded blobs
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the web root and its blob directories if absent.
    pub fn bootstrap(&self) -> Result<(), BlobError> {
        for dir in [self.root.clone(), self.root.join(VIDEO_DIR), self.root.join(IMAGE_DIR)] {
            std::fs::create_dir_all(&dir).map_err(|source| BlobError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        info!(root = %self.root.display(), "blob storage ready");
        Ok(())
    }

    /// Relative path for an uploaded file: `/<kind>/<entry name><file name>`.
    ///
    /// Separators in the entry name are replaced and the uploaded file name
    /// is cut down to its final component, so the result always stays in
    /// the kind's directory.
    pub fn blob_path(kind: BlobKind, entry_name: &str, file_name: &str) -> String {
        let name: String = entry_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        let file = file_name
            .rsplit(['/', '\\'])
            .next()
            .filter(|f| !matches!(*f, "" | "." | ".."))
            .unwrap_or("upload");

        format!("/{}/{}{}", kind.dir(), name, file)
    }

    /// Absolute location of `rel_path` under the root.
    ///
    /// Leading `/` is allowed (stored paths carry one); `..` is not.
    pub fn resolve(&self, rel_path: &str) -> Result<PathBuf, BlobError> {
        let trimmed = rel_path.trim_start_matches('/');
        let relative = Path::new(trimmed);

        let clean = !trimmed.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !clean {
            return Err(BlobError::InvalidPath {
                path: rel_path.to_string(),
            });
        }

        Ok(self.root.join(relative))
    }

    /// Write `bytes` to a new file at `rel_path`, creating parent
    /// directories as needed.
    ///
    /// An existing file is never replaced: it belongs to another entry.
    pub fn write(&self, rel_path: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.resolve(rel_path)?;
        let io_err = |source| BlobError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(BlobError::Exists {
                    path: rel_path.to_string(),
                })
            }
            Err(source) => return Err(io_err(source)),
        };
        if let Err(source) = file.write_all(bytes) {
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(io_err(source));
        }

        debug!(path = %path.display(), bytes = bytes.len(), "blob written");
        Ok(())
    }

    /// Delete the file at `rel_path`. A file that is already gone is fine.
    pub fn remove(&self, rel_path: &str) -> Result<(), BlobError> {
        let path = self.resolve(rel_path)?;

        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "blob removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "blob already missing");
                Ok(())
            }
            Err(source) => Err(BlobError::Io { path, source }),
        }
    }
}
