//! In-memory stores for handler tests.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use envform_config::{ConfigError, ConfigMap, ConfigResult, EnvStore};
use envform_telemetry::Metrics;

use crate::state::ApiState;

/// Store that keeps the map in memory, seeded from defaults.
#[derive(Default)]
pub(crate) struct MemoryStore {
    map: Mutex<Option<ConfigMap>>,
}

impl MemoryStore {
    pub(crate) fn with(map: ConfigMap) -> Self {
        Self {
            map: Mutex::new(Some(map)),
        }
    }

    pub(crate) fn current(&self) -> Option<ConfigMap> {
        self.map.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl EnvStore for MemoryStore {
    async fn load(&self) -> ConfigResult<ConfigMap> {
        let mut guard = self.map.lock().map_err(|_| poisoned("memory.load"))?;
        Ok(guard.get_or_insert_with(ConfigMap::defaults).clone())
    }

    async fn save(&self, map: &ConfigMap) -> ConfigResult<()> {
        let mut guard = self.map.lock().map_err(|_| poisoned("memory.save"))?;
        *guard = Some(map.clone());
        Ok(())
    }
}

/// Store whose every operation fails.
pub(crate) struct FailingStore;

#[async_trait]
impl EnvStore for FailingStore {
    async fn load(&self) -> ConfigResult<ConfigMap> {
        Err(unavailable("failing.load"))
    }

    async fn save(&self, _: &ConfigMap) -> ConfigResult<()> {
        Err(unavailable("failing.save"))
    }
}

fn unavailable(operation: &'static str) -> ConfigError {
    ConfigError::StoreUnavailable {
        operation,
        path: PathBuf::from("/.env"),
        source: io::Error::other("stubbed store failure"),
    }
}

fn poisoned(operation: &'static str) -> ConfigError {
    ConfigError::StoreUnavailable {
        operation,
        path: PathBuf::from("memory"),
        source: io::Error::other("store lock poisoned"),
    }
}

pub(crate) fn state_with(store: Arc<dyn EnvStore>) -> anyhow::Result<Arc<ApiState>> {
    Ok(Arc::new(ApiState::new(store, Metrics::new()?)))
}
