//! Configuration resolution for the vodctl binary
//!
//! Precedence, lowest first: built-in defaults, the TOML file named by
//! `--config` / `VODCTL_CONFIG`, then `--db`/`--www`/`--bind` flags (which clap
//! also fills from `VODCTL_DB`, `VODCTL_WWW`, `VODCTL_BIND`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vodctl_server::VodConfig;

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db: Option<PathBuf>,
    pub www: Option<PathBuf>,
    pub bind: Option<SocketAddr>,
    pub max_upload_bytes: Option<usize>,
}

impl Overrides {
    pub fn apply(self, mut config: VodConfig) -> VodConfig {
        if let Some(db) = self.db {
            config.database.path = db;
        }
        if let Some(www) = self.www {
            config.storage.www_root = www;
        }
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(limit) = self.max_upload_bytes {
            config.server.max_upload_bytes = limit;
        }
        config
    }
}

/// Load the config file (if any) and layer `overrides` on top.
pub fn resolve(config_path: Option<&Path>, overrides: Overrides) -> Result<VodConfig> {
    let base = VodConfig::load(config_path).with_context(|| match config_path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load default config".to_string(),
    })?;
    Ok(overrides.apply(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_no_flags_is_default() {
        let config = resolve(None, Overrides::default()).unwrap();
        assert_eq!(config, VodConfig::default());
    }

    #[test]
    fn flags_beat_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vodctl.toml");
        std::fs::write(
            &path,
            "[database]\npath = \"from-file.db\"\n[storage]\nwww_root = \"/srv/www\"\n",
        )
        .unwrap();

        let config = resolve(
            Some(&path),
            Overrides {
                db: Some(PathBuf::from("from-flag.db")),
                ..Overrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("from-flag.db"));
        assert_eq!(config.storage.www_root, PathBuf::from("/srv/www"));
    }

    #[test]
    fn serve_overrides_apply() {
        let config = Overrides {
            bind: Some("127.0.0.1:9000".parse().unwrap()),
            max_upload_bytes: Some(42),
            ..Overrides::default()
        }
        .apply(VodConfig::default());

        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.server.max_upload_bytes, 42);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = resolve(Some(Path::new("/nope/vodctl.toml")), Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("/nope/vodctl.toml"));
    }
}
