use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::app::AppState;
use crate::auth::cookie::token_cookie;
use crate::database::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(request) = payload?;
    let created = state.credentials.register(request).await?;
    Ok(ApiResponse::created(created))
}

/// POST /api/auth/login
///
/// Returns the token in the body and also sets it as an HTTP-only cookie.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let session = state.credentials.login(request).await?;

    let cookie = token_cookie(
        &session.token,
        state.tokens.lifetime_seconds(),
        state.config.security.cookie_secure,
    );

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(session)).into_response())
}
