//! Filter list editing endpoints.
//!
//! # Design
//! - Every edit loads the current file, applies the change through
//!   [`FilterList`] and saves the whole map, so the stored separator and the
//!   encoded list never drift apart.
//! - Separator repairs are counted; exhaustion is surfaced in the response
//!   rather than failing the request.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use envform_config::{EditOutcome, FILTER_KEY, FilterEditError, FilterList};
use tracing::info;

use crate::http::errors::ApiError;
use crate::models::{FilterEditRequest, FilterEditResponse, FilterView};
use crate::state::ApiState;

pub(crate) async fn get_filter(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<FilterView>, ApiError> {
    let map = state.load_config().await?;
    let list = FilterList::from_config(&map, FILTER_KEY);
    Ok(Json(FilterView::from(&list)))
}

pub(crate) async fn edit_filter(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<FilterEditRequest>,
) -> Result<Json<FilterEditResponse>, ApiError> {
    let mut map = state.load_config().await?;
    let mut list = FilterList::from_config(&map, FILTER_KEY);
    let outcome = list
        .set_entry(request.index, request.value)
        .map_err(index_error)?;

    match &outcome {
        EditOutcome::SeparatorKept => {}
        EditOutcome::SeparatorChanged { previous } => {
            state.telemetry.inc_separator_change();
            info!(previous = %previous, next = %list.separator(), "filter separator replaced");
        }
        EditOutcome::SeparatorExhausted { .. } => state.telemetry.inc_separator_exhausted(),
    }

    list.write_to(&mut map);
    state.save_config(&map).await?;
    Ok(Json(FilterEditResponse {
        view: FilterView::from(&list),
        outcome,
    }))
}

pub(crate) async fn delete_filter_entry(
    State(state): State<Arc<ApiState>>,
    Path(index): Path<usize>,
) -> Result<Json<FilterView>, ApiError> {
    let mut map = state.load_config().await?;
    let mut list = FilterList::from_config(&map, FILTER_KEY);
    let removed = list.remove_entry(index).map_err(index_error)?;
    info!(index, removed = %removed, "filter entry removed");

    list.write_to(&mut map);
    state.save_config(&map).await?;
    Ok(Json(FilterView::from(&list)))
}

fn index_error(err: FilterEditError) -> ApiError {
    let detail = err.to_string();
    let FilterEditError::IndexOutOfRange { index, len } = err;
    ApiError::bad_request(detail)
        .with_invalid_param("/index", format!("{index} is past the {len} stored entries"))
}
