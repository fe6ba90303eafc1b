//! Field catalog with current values and shape checks.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use envform_config::{FIELD_SPECS, FieldSpec, check_field, field_spec};
use tracing::error;

use crate::http::errors::ApiError;
use crate::models::FieldView;
use crate::state::ApiState;

pub(crate) async fn list_fields(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<FieldView>>, ApiError> {
    let map = state.load_config().await?.merged_over_defaults();
    let fields = FIELD_SPECS
        .iter()
        .map(|spec| field_view(spec, map.get(spec.key).unwrap_or_default()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(fields))
}

pub(crate) async fn get_field(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> Result<Json<FieldView>, ApiError> {
    let spec = field_spec(&key)
        .ok_or_else(|| ApiError::not_found(format!("no form field named `{key}`")))?;
    let map = state.load_config().await?.merged_over_defaults();
    Ok(Json(field_view(spec, map.get(spec.key).unwrap_or_default())?))
}

fn field_view(spec: &FieldSpec, value: &str) -> Result<FieldView, ApiError> {
    let valid = check_field(spec.kind, value).map_err(|err| {
        error!(error = %err, field = spec.key, "field check failed");
        ApiError::internal("failed to check field shape")
    })?;
    Ok(FieldView::new(spec, value, valid))
}
