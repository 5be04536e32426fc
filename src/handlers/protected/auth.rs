use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{ProfileUpdate, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, MessageResponse};

/// GET /api/auth/profile
pub async fn profile_get(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

/// PUT /api/auth/profile
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<User> {
    let Json(update) = payload?;
    let updated = state.credentials.update_profile(user.id, update).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/auth/delete
pub async fn account_delete(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    state.credentials.delete_account(user.id).await?;
    Ok(ApiResponse::success(MessageResponse::new("User deleted successfully")))
}
