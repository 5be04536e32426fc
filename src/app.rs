use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::store::Store;
use crate::handlers::{protected, public};
use crate::middleware::{request_metrics, require_auth, track_metrics};
use crate::services::{CredentialService, NoteService};

/// Shared request state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub credentials: CredentialService,
    pub notes: NoteService,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, TokenError> {
        let tokens = TokenService::from_config(&config.security)?;
        Ok(Self {
            credentials: CredentialService::new(store.clone(), tokens.clone()),
            notes: NoteService::new(store.clone()),
            config: Arc::new(config),
            store,
            tokens,
            metrics: request_metrics::recorder_handle(),
        })
    }
}

/// Build the full API router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origin);

    Router::new()
        .route("/", get(public::system::root))
        .route("/ping", get(public::system::ping))
        .route("/health", get(public::system::health))
        .route("/metrics", get(public::system::metrics))
        .merge(auth_public_routes())
        .merge(protected_routes(state.clone()))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, notes};

    Router::new()
        .route(
            "/api/auth/profile",
            get(auth::profile_get).put(auth::profile_put),
        )
        .route("/api/auth/delete", delete(auth::account_delete))
        .route("/api/notes", get(notes::list).post(notes::create))
        .route(
            "/api/notes/:id",
            get(notes::get).put(notes::update).delete(notes::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

// Exactly one allowed origin, with credentials
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            tracing::warn!("Invalid CORS origin {:?}: {}; cross-origin requests disabled", origin, e);
            layer
        }
    }
}
