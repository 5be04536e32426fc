use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::auth::cookie::{find_cookie, TOKEN_COOKIE};
use crate::database::models::User;
use crate::error::ApiError;

/// Authenticated user resolved from the request token
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Where the request token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Bearer,
    Cookie,
}

/// Authentication gate for protected routes.
///
/// Verifies the token, then re-resolves the user so that a deleted account
/// stops authenticating immediately even while its token is still unexpired.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (token, source) = extract_token(request.headers()).ok_or(ApiError::NoTokenFound)?;
    debug!("Authenticating request via {:?} token", source);

    let claims = state.tokens.verify(&token).map_err(|e| {
        warn!("Rejected token from {:?}: {}", source, e);
        ApiError::InvalidToken
    })?;

    let user = state
        .credentials
        .find_user(claims.id)
        .await?
        .ok_or_else(|| {
            warn!("Token subject {} no longer exists", claims.id);
            ApiError::UserNotFound
        })?;

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

/// Bearer header first, then the token cookie
pub fn extract_token(headers: &HeaderMap) -> Option<(String, TokenSource)> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some((token.to_string(), TokenSource::Bearer));
    }

    find_cookie(headers, TOKEN_COOKIE)
        .filter(|token| !token.is_empty())
        .map(|token| (token, TokenSource::Cookie))
}
