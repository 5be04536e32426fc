use std::sync::Arc;

use anyhow::Context;
use notes_api::config::AppConfig;
use notes_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use notes_api::{app, init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();
    init_tracing("notes_api=info,tower_http=info");

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting notes API in {:?} mode", config.environment);
    if config.is_production() && !config.security.cookie_secure {
        tracing::warn!("COOKIE_SECURE is disabled in production; token cookies will be sent over plain HTTP");
    }

    let store: Arc<dyn Store> = match config.database.url.as_deref() {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::bootstrap(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store).context("failed to initialize token service")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
