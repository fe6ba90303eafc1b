//! Persistence of the configuration map.
//!
//! # Design
//! - `EnvStore` is the seam the HTTP layer depends on; `EnvFileStore` backs it
//!   with a single flat file.
//! - A missing file is seeded from the canonical defaults before the first read.
//! - Saves overwrite the whole file. There is no locking: concurrent writers race
//!   and the last one wins.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::model::ConfigMap;

/// Storage backend for the configuration map.
#[async_trait]
pub trait EnvStore: Send + Sync {
    /// Load the current configuration, creating it from defaults when absent.
    async fn load(&self) -> ConfigResult<ConfigMap>;
    /// Replace the stored configuration with `map`.
    async fn save(&self, map: &ConfigMap) -> ConfigResult<()>;
}

/// `EnvStore` backed by a `KEY=VALUE` file on disk.
#[derive(Debug, Clone)]
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    /// Construct a store for the file at `path`. The file is not touched until
    /// the first load.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_initialised(&self) -> ConfigResult<()> {
        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|source| self.unavailable("env_store.exists", source))?;
        if exists {
            return Ok(());
        }

        info!(path = %self.path.display(), "creating configuration file with defaults");
        fs::write(&self.path, ConfigMap::defaults().to_env_string())
            .await
            .map_err(|source| self.unavailable("env_store.initialise", source))
    }

    fn unavailable(&self, operation: &'static str, source: io::Error) -> ConfigError {
        ConfigError::StoreUnavailable {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl EnvStore for EnvFileStore {
    async fn load(&self) -> ConfigResult<ConfigMap> {
        self.ensure_initialised().await?;
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.unavailable("env_store.read", source))?;
        let map = ConfigMap::parse(&content);
        debug!(path = %self.path.display(), keys = map.len(), "configuration loaded");
        Ok(map)
    }

    async fn save(&self, map: &ConfigMap) -> ConfigResult<()> {
        fs::write(&self.path, map.to_env_string())
            .await
            .map_err(|source| self.unavailable("env_store.write", source))?;
        info!(path = %self.path.display(), keys = map.len(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_seeds_missing_file_with_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let store = EnvFileStore::new(temp.path().join(".env"));

        let map = store.load().await?;
        assert_eq!(map, ConfigMap::defaults());
        let written = std::fs::read_to_string(store.path())?;
        assert_eq!(written, ConfigMap::defaults().to_env_string());
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_whole_file() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join(".env");
        std::fs::write(&path, "OLD=1\nSTALE=2")?;
        let store = EnvFileStore::new(&path);

        let map: ConfigMap = [("FILTER", "a=b")].into_iter().collect();
        store.save(&map).await?;
        assert_eq!(std::fs::read_to_string(&path)?, "FILTER=a=b");
        assert_eq!(store.load().await?, map);
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_location_reports_store_unavailable() -> Result<()> {
        let temp = TempDir::new()?;
        let store = EnvFileStore::new(temp.path().join("missing-dir").join(".env"));

        let err = store
            .load()
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected load failure"))?;
        assert!(matches!(
            err,
            ConfigError::StoreUnavailable {
                operation: "env_store.initialise",
                ..
            }
        ));

        let err = store
            .save(&ConfigMap::defaults())
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected save failure"))?;
        assert!(matches!(
            err,
            ConfigError::StoreUnavailable {
                operation: "env_store.write",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn directory_path_is_not_readable_as_config() -> Result<()> {
        let temp = TempDir::new()?;
        let store = EnvFileStore::new(temp.path());

        let err = store
            .load()
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected read failure"))?;
        assert!(matches!(
            err,
            ConfigError::StoreUnavailable {
                operation: "env_store.read",
                ..
            }
        ));
        Ok(())
    }
}
