//! Catalog entry - the one record type the store manages
//!
//! JSON field names follow the bundled web front-end: `info` carries the
//! description, `video`/`image` carry the blob paths.

use serde::{Deserialize, Serialize};

use super::validation::{require_non_empty, ValidationError};

/// A persisted catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    #[serde(rename = "info")]
    pub description: String,
    #[serde(rename = "video")]
    pub video_path: String,
    #[serde(rename = "image")]
    pub image_path: String,
}

/// Fields supplied by the caller when creating an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    #[serde(rename = "info", default)]
    pub description: String,
    #[serde(rename = "video")]
    pub video_path: String,
    #[serde(rename = "image")]
    pub image_path: String,
}

impl NewEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        video_path: impl Into<String>,
        image_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            video_path: video_path.into(),
            image_path: image_path.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)
    }
}

/// Mutable fields of an entry. Blob paths are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub name: String,
    #[serde(rename = "info", default)]
    pub description: String,
}

impl EntryUpdate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)
    }
}
