use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{CreateNoteRequest, Note, UpdateNoteRequest};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, MessageResponse};

/// GET /api/notes
pub async fn list(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Vec<Note>> {
    Ok(ApiResponse::success(state.notes.list(user.id).await?))
}

/// GET /api/notes/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Note> {
    Ok(ApiResponse::success(state.notes.get(&id, user.id).await?))
}

/// POST /api/notes
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<Note> {
    let Json(request) = payload?;
    Ok(ApiResponse::created(state.notes.create(user.id, request).await?))
}

/// PUT /api/notes/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<Note> {
    let Json(patch) = payload?;
    Ok(ApiResponse::success(state.notes.update(&id, user.id, patch).await?))
}

/// DELETE /api/notes/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state.notes.delete(&id, user.id).await?;
    Ok(ApiResponse::success(MessageResponse::new("Note deleted successfully")))
}
