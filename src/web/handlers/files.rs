//! File listing and deletion handlers.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::web::dto::{DeleteFileRequest, FileItem, FilesResponse, SuccessResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/files - List the most recent uploads.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilesResponse>, ApiError> {
    state.guard()?;

    let files = state.files.list().await.map_err(|e| state.api_error(e))?;

    Ok(Json(FilesResponse {
        files: files.into_iter().map(FileItem::from).collect(),
    }))
}

/// DELETE /api/files - Delete an upload by stored name.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DeleteFileRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.guard()?;
    let Json(req) = body?;

    state
        .files
        .remove(&req.stored_name)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(SuccessResponse::ok()))
}
