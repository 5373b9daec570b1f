//! Text clip handlers.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::web::dto::{
    ClipResponse, ClipsResponse, CreateClipRequest, DeleteClipRequest, SuccessResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/text - List the most recent clips.
pub async fn list_clips(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClipsResponse>, ApiError> {
    state.guard()?;

    let clips = state.clips.list().await.map_err(|e| state.api_error(e))?;
    Ok(Json(ClipsResponse { clips }))
}

/// POST /api/text - Save a clip.
pub async fn create_clip(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateClipRequest>, JsonRejection>,
) -> Result<Json<ClipResponse>, ApiError> {
    state.guard()?;
    let Json(req) = body?;

    let clip = state
        .clips
        .create(req.content, req.label)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(ClipResponse { clip }))
}

/// DELETE /api/text - Delete a clip by id.
pub async fn delete_clip(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DeleteClipRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.guard()?;
    let Json(req) = body?;

    state
        .clips
        .delete(&req.id)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(SuccessResponse::ok()))
}
