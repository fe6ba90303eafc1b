//! Shared handler state.

use std::sync::Arc;

use envform_config::{ConfigMap, EnvStore};
use envform_telemetry::{Metrics, StoreOp, StoreOutcome};
use tracing::error;

use crate::http::errors::ApiError;

/// Dependencies shared by every handler.
pub struct ApiState {
    pub(crate) store: Arc<dyn EnvStore>,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    /// Bundle the configuration store with the metrics registry.
    #[must_use]
    pub fn new(store: Arc<dyn EnvStore>, telemetry: Metrics) -> Self {
        Self { store, telemetry }
    }

    /// Load the configuration, counting the outcome.
    pub(crate) async fn load_config(&self) -> Result<ConfigMap, ApiError> {
        match self.store.load().await {
            Ok(map) => {
                self.telemetry.record_store_op(StoreOp::Load, StoreOutcome::Ok);
                Ok(map)
            }
            Err(err) => {
                self.telemetry
                    .record_store_op(StoreOp::Load, StoreOutcome::Error);
                error!(error = %err, "failed to load configuration");
                Err(ApiError::internal("failed to read configuration"))
            }
        }
    }

    /// Persist the configuration, counting the outcome.
    pub(crate) async fn save_config(&self, map: &ConfigMap) -> Result<(), ApiError> {
        match self.store.save(map).await {
            Ok(()) => {
                self.telemetry.record_store_op(StoreOp::Save, StoreOutcome::Ok);
                Ok(())
            }
            Err(err) => {
                self.telemetry
                    .record_store_op(StoreOp::Save, StoreOutcome::Error);
                error!(error = %err, "failed to save configuration");
                Err(ApiError::internal("failed to write configuration"))
            }
        }
    }
}
