use anyhow::Context;
use notes_api::proxy::{self, ProxyConfig, ProxyState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    notes_api::init_tracing("notes_api=info,tower_http=info");

    let config = ProxyConfig::from_env().context("invalid proxy configuration")?;
    let bind_addr = config.bind_addr();
    tracing::info!("Forwarding to API at {}", config.api_url);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Notes proxy listening on http://{}", bind_addr);

    axum::serve(listener, proxy::router(ProxyState::new(config)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("proxy server error")?;

    Ok(())
}
