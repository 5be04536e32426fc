use std::env;

use url::Url;

use crate::config::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub api_url: Url,
    pub host: String,
    pub port: u16,
    pub cookie_secure: bool,
    /// `Max-Age` of the token cookie
    pub cookie_max_age_secs: i64,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(raw_url.trim()).map_err(|_| ConfigError::InvalidValue {
            key: "API_URL",
            value: raw_url.clone(),
        })?;

        let production = matches!(lookup("APP_ENV").as_deref(), Some("production") | Some("prod"));

        let mut config = Self {
            api_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: 3000,
            cookie_secure: production,
            cookie_max_age_secs: 30 * SECONDS_PER_DAY,
        };

        if let Some(v) = lookup("PROXY_PORT") {
            config.port = parse_value("PROXY_PORT", &v)?;
        }
        if let Some(v) = lookup("COOKIE_SECURE") {
            config.cookie_secure = parse_value("COOKIE_SECURE", &v)?;
        }
        if let Some(v) = lookup("JWT_EXPIRY_DAYS") {
            let days: i64 = parse_value("JWT_EXPIRY_DAYS", &v)?;
            config.cookie_max_age_secs = days
                .checked_mul(SECONDS_PER_DAY)
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "JWT_EXPIRY_DAYS",
                    value: v.clone(),
                })?;
        }

        Ok(config)
    }

    /// Absolute upstream URL for an API path
    pub fn upstream(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_url.join(path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
