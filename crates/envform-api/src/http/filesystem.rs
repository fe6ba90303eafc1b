//! Filesystem inspection endpoint backing the target directory picker.
//!
//! # Design
//! - Read-only; lists child directories of an existing directory and nothing else.
//! - Failures are request-level (`400`) so a mistyped path never looks like an outage.
//! - Responses are marked `no-store`; listings change underneath the editor.

use std::path::Path;

use axum::{
    Json,
    extract::Query,
    http::header::CACHE_CONTROL,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use crate::http::constants::CACHE_CONTROL_NO_STORE;
use crate::http::errors::ApiError;
use crate::models::DirectoryListing;

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) path: Option<String>,
}

pub(crate) async fn list_directories(
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let Some(path) = query.path.filter(|path| !path.is_empty()) else {
        return Err(ApiError::bad_request("path parameter is required")
            .with_invalid_param("/path", "missing"));
    };

    let directories = child_directories(Path::new(&path)).await?;
    info!(path = %path, count = directories.len(), "directory listing");

    let listing = DirectoryListing {
        success: true,
        parent: parent_path(&path),
        path,
        directories,
    };
    Ok(([(CACHE_CONTROL, CACHE_CONTROL_NO_STORE)], Json(listing)).into_response())
}

async fn child_directories(path: &Path) -> Result<Vec<String>, ApiError> {
    let mut reader = fs::read_dir(path).await.map_err(|err| {
        warn!(path = %path.display(), error = %err, "directory read failed");
        ApiError::bad_request(format!("failed to read directory: {err}"))
    })?;

    let mut directories = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(|err| {
        warn!(path = %path.display(), error = %err, "directory entry read failed");
        ApiError::bad_request(format!("failed to read directory entry: {err}"))
    })? {
        let is_dir = entry
            .file_type()
            .await
            .is_ok_and(|file_type| file_type.is_dir());
        if is_dir {
            directories.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    directories.sort();
    Ok(directories)
}

/// Path one level above `path`, with a trailing slash.
///
/// Trailing slashes on the input are ignored; the root and bare names map to `/`.
pub(crate) fn parent_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => format!("{}/", &trimmed[..index]),
    }
}
