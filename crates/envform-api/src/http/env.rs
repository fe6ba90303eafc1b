//! Whole-file read and write of the environment configuration.

use std::sync::Arc;

use axum::{Json, extract::State};
use envform_config::ConfigMap;
use tracing::info;

use crate::http::errors::ApiError;
use crate::models::SuccessResponse;
use crate::state::ApiState;

pub(crate) async fn get_env(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ConfigMap>, ApiError> {
    let map = state.load_config().await?;
    info!(keys = map.len(), "returning configuration");
    Ok(Json(map))
}

pub(crate) async fn post_env(
    State(state): State<Arc<ApiState>>,
    Json(map): Json<ConfigMap>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.save_config(&map).await?;
    Ok(Json(SuccessResponse::OK))
}
