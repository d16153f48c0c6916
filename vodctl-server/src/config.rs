//! Service configuration
//!
//! Loaded once at startup, never reloaded. Sources, lowest precedence first:
//! built-in defaults, an optional TOML file, then whatever the binary layers
//! on top (environment variables and flags).
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8899"
//! max_upload_bytes = 1073741824
//!
//! [database]
//! path = "vod.db"
//!
//! [storage]
//! www_root = "./www"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseLocation;

pub const DEFAULT_PORT: u16 = 8899;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VodConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to listen on
    pub bind: SocketAddr,
    /// Largest accepted request body (uploads carry whole videos)
    pub max_upload_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Database file, or `:memory:`
    pub path: PathBuf,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vod.db"),
        }
    }
}

impl DatabaseSection {
    pub fn location(&self) -> DatabaseLocation {
        DatabaseLocation::from(self.path.as_path())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Web root: static front-end plus `video/` and `image/` blob directories
    pub www_root: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            www_root: PathBuf::from("./www"),
        }
    }
}

impl VodConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }
}
