//! Connection settings file
//!
//! A small TOML key-value file, `bookshop.toml` by default:
//!
//! ```toml
//! database = "bookshop.db"
//! fixtures = "tests_data.json"
//! ```
//!
//! Every command except `init` requires the file to exist.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BookshopConfig {
    pub database: Option<String>,
    pub fixtures: Option<String>,
}

impl BookshopConfig {
    /// Database path, falling back to [`default_database_path`]
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    pub fn fixtures_path(&self) -> Option<PathBuf> {
        self.fixtures.as_deref().map(PathBuf::from)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bookshop.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("bookshop.db")
}

/// Load the config file. A missing file is an error, not a default.
pub fn load_config(path: &Path) -> Result<BookshopConfig> {
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let config: BookshopConfig =
        toml::from_str(&contents).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn write_config(path: &Path, config: &BookshopConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(load_config(&path), Err(Error::ConfigNotFound(p)) if p == path));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshop.toml");
        let config = BookshopConfig {
            database: Some("data/shop.db".to_string()),
            fixtures: None,
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
        assert_eq!(config.database_path(), PathBuf::from("data/shop.db"));

        // Refuses to clobber without force
        assert!(matches!(write_config(&path, &config, false), Err(Error::Config(_))));
        write_config(&path, &config, true).unwrap();
    }

    #[test]
    fn test_defaults_and_bad_keys() {
        assert_eq!(BookshopConfig::default().database_path(), default_database_path());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshop.toml");
        std::fs::write(&path, "password = \"hunter2\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(Error::Config(_))));
    }
}
