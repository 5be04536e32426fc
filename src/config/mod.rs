use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while assembling configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. When absent the in-memory store is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    /// Single origin allowed to call the API with credentials
    pub cors_origin: String,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_days", &self.jwt_expiry_days)
            .field("cors_origin", &self.cors_origin)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl AppConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Presets are chosen by `APP_ENV`, then individual variables override them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("test") => Environment::Test,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_value("PORT", &v)?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_value("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_value("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("JWT_EXPIRY_DAYS") {
            self.security.jwt_expiry_days = parse_value("JWT_EXPIRY_DAYS", &v)?;
        }
        if let Some(v) = lookup("CLIENT_URL") {
            self.security.cors_origin = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("COOKIE_SECURE") {
            self.security.cookie_secure = parse_value("COOKIE_SECURE", &v)?;
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.security.jwt_expiry_days <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "JWT_EXPIRY_DAYS",
                value: self.security.jwt_expiry_days.to_string(),
            });
        }
        if self.environment == Environment::Production && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if axum::http::HeaderValue::from_str(&self.security.cors_origin).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "CLIENT_URL",
                value: self.security.cors_origin.clone(),
            });
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                cors_origin: "http://localhost:3000".to_string(),
                cookie_secure: false,
            },
        }
    }

    fn test() -> Self {
        Self {
            environment: Environment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 2,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                cors_origin: "http://localhost:3000".to_string(),
                cookie_secure: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                cors_origin: "http://localhost:3000".to_string(),
                cookie_secure: true,
            },
        }
    }

    /// Test preset with the given signing secret and no database
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        let mut config = Self::test();
        config.security.jwt_secret = jwt_secret.into();
        config
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
