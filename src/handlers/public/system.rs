use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "msg": "Hello",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "msg": "Ping!" }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": backend,
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed for {} backend: {}", backend, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": backend,
                })),
            )
        }
    }
}

/// GET /metrics, Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.run_upkeep();
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
