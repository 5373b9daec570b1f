//! Batch upload handler.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::file::IncomingFile;
use crate::web::dto::{UploadResponse, UploadResult};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Multipart field carrying files.
pub const FILES_FIELD: &str = "files";

/// Name used for file parts sent without a filename.
pub const UNNAMED_FILE: &str = "blob";

/// POST /api/upload - Store a batch of files.
///
/// Request body: multipart/form-data with a repeatable `files` field. Other
/// fields are ignored. Each file gets its own entry in `results`.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    state.guard()?;
    let mut multipart = multipart?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ApiError::from_multipart)?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_FILE)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let content = field.bytes().await.map_err(ApiError::from_multipart)?;

        files.push(IncomingFile {
            name,
            content: content.to_vec(),
            content_type,
        });
    }

    tracing::debug!("Received {} file(s) for upload", files.len());

    let outcomes = state
        .files
        .ingest_batch(files)
        .await
        .map_err(|e| state.api_error(e))?;

    let results = outcomes
        .into_iter()
        .map(|outcome| UploadResult::from_outcome(outcome, &state.rewrites))
        .collect();

    Ok(Json(UploadResponse { results }))
}
