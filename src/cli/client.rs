use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::cli::config::CliConfig;

/// Failure reported by the API, carrying its `{message}` body
#[derive(Debug, thiserror::Error)]
#[error("{message} ({status})")]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

/// Thin JSON client over the notes API
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid server URL: {}", base_url))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token,
        })
    }

    pub fn from_config(config: &CliConfig) -> anyhow::Result<Self> {
        Self::new(&config.server_url, config.token.clone())
    }

    /// Same as `from_config`, but fails early when not logged in
    pub fn authenticated(config: &CliConfig) -> anyhow::Result<Self> {
        if config.token.is_none() {
            return Err(anyhow!("Not logged in. Run `notes auth login <email>` first"));
        }
        Self::from_config(config)
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    async fn send<B: Serialize>(&self, method: Method, path: &str, body: Option<&B>) -> anyhow::Result<Value> {
        let url = self.base.join(path)?;
        let mut request = self.http.request(method, url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(ApiFailure { status, message }.into());
        }

        Ok(payload)
    }
}
