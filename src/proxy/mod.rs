//! Same-origin proxy in front of the API.
//!
//! Browsers talk to the proxy; it keeps the token in an HTTP-only cookie and
//! forwards requests to the API with a bearer header.

pub mod config;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use config::ProxyConfig;
pub use error::ProxyError;

/// Shared proxy state
#[derive(Clone)]
pub struct ProxyState {
    pub client: reqwest::Client,
    pub config: ProxyConfig,
}

impl ProxyState {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/notes", get(handlers::list_notes).post(handlers::create_note))
        .route(
            "/api/notes/:id",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
