#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use notes_api::config::AppConfig;
use notes_api::database::MemoryStore;
use notes_api::proxy::{self, ProxyConfig, ProxyState};
use notes_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a user and return the response body
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        Ok(res.json().await?)
    }

    /// Register a user and return its token
    pub async fn token_for(&self, name: &str, email: &str) -> Result<String> {
        let body = self.register(name, email, "secret123").await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("register response had no token")
    }

    pub async fn create_note(&self, token: &str, title: &str, content: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/notes"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        Ok(res.json().await?)
    }
}

/// Start the API on a free port over the in-memory store
pub async fn spawn_api() -> Result<TestServer> {
    let state = AppState::new(AppConfig::for_tests(TEST_SECRET), Arc::new(MemoryStore::new()))?;
    let port = serve(app(state)).await?;
    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    })
}

/// Start a proxy in front of `api`
pub async fn spawn_proxy(api: &TestServer) -> Result<TestServer> {
    let api_url = api.base_url.clone();
    let config = ProxyConfig::from_lookup(|key| match key {
        "API_URL" => Some(api_url.clone()),
        _ => None,
    })?;
    let port = serve(proxy::router(ProxyState::new(config))).await?;
    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    })
}

async fn serve(router: axum::Router) -> Result<u16> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    wait_ready(port, Duration::from_secs(5)).await?;
    Ok(port)
}

async fn wait_ready(port: u16, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server on port {} did not become ready within {:?}", port, timeout)
}
