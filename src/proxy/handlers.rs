use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::cookie::{clear_token_cookie, find_cookie, token_cookie, TOKEN_COOKIE};
use crate::proxy::{ProxyError, ProxyState};

/// Upstream status and JSON body
struct Upstream {
    status: StatusCode,
    body: Value,
}

impl IntoResponse for Upstream {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

async fn forward(
    state: &ProxyState,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<Upstream, ProxyError> {
    let url = state.config.upstream(path)?;
    let mut request = state.client.request(method, url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response
        .json::<Value>()
        .await
        .map_err(|e| ProxyError::UpstreamBody {
            status,
            reason: e.to_string(),
        })?;

    Ok(Upstream { status, body })
}

fn require_token(headers: &HeaderMap) -> Result<String, ProxyError> {
    find_cookie(headers, TOKEN_COOKIE).ok_or(ProxyError::NotAuthenticated)
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ProxyError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ProxyError::InvalidBody(rejection.body_text()))
}

/// Only well-formed note ids are forwarded; anything else could address another route upstream.
fn note_path(raw_id: &str) -> Result<String, ProxyError> {
    let id = Uuid::parse_str(raw_id).map_err(|_| ProxyError::InvalidId(raw_id.to_string()))?;
    Ok(format!("/api/notes/{}", id))
}

/// GET /ping
pub async fn ping(State(state): State<ProxyState>) -> Result<Json<Value>, ProxyError> {
    let upstream = forward(&state, Method::GET, "/ping", None, None).await?;
    let msg = upstream.body.get("msg").and_then(Value::as_str).unwrap_or_default();

    Ok(Json(json!({
        "message": format!("Ping received from {} with message {}", state.config.api_url, msg),
    })))
}

/// POST /api/auth/login
///
/// The token never reaches the browser body; it is moved into the cookie.
pub async fn login(
    State(state): State<ProxyState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let body = json_body(payload)?;
    let upstream = forward(&state, Method::POST, "/api/auth/login", None, Some(body)).await?;

    let token = match upstream.body.get("token").and_then(Value::as_str) {
        Some(token) if upstream.status.is_success() => token.to_string(),
        _ => return Ok(upstream.into_response()),
    };

    let cookie = token_cookie(&token, state.config.cookie_max_age_secs, state.config.cookie_secure);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "Login successful" })),
    )
        .into_response())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ProxyState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let body = json_body(payload)?;
    let upstream = forward(&state, Method::POST, "/api/auth/register", None, Some(body)).await?;
    Ok(upstream.into_response())
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<ProxyState>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_token_cookie(state.config.cookie_secure))],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response()
}

/// GET /api/notes
pub async fn list_notes(State(state): State<ProxyState>, headers: HeaderMap) -> Result<Response, ProxyError> {
    let token = require_token(&headers)?;
    Ok(forward(&state, Method::GET, "/api/notes", Some(&token), None).await?.into_response())
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let token = require_token(&headers)?;
    let body = json_body(payload)?;
    Ok(forward(&state, Method::POST, "/api/notes", Some(&token), Some(body)).await?.into_response())
}

/// GET /api/notes/:id
pub async fn get_note(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ProxyError> {
    let token = require_token(&headers)?;
    let path = note_path(&id)?;
    Ok(forward(&state, Method::GET, &path, Some(&token), None).await?.into_response())
}

/// PUT /api/notes/:id
pub async fn update_note(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let token = require_token(&headers)?;
    let path = note_path(&id)?;
    let body = json_body(payload)?;
    Ok(forward(&state, Method::PUT, &path, Some(&token), Some(body)).await?.into_response())
}

/// DELETE /api/notes/:id
pub async fn delete_note(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ProxyError> {
    let token = require_token(&headers)?;
    let path = note_path(&id)?;
    Ok(forward(&state, Method::DELETE, &path, Some(&token), None).await?.into_response())
}
