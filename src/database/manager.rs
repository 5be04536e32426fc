use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Sort a driver error into the variants callers branch on
    pub fn classify(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                return DatabaseError::Duplicate(db_err.message().to_string());
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                return DatabaseError::ConnectionError(err.to_string());
            }
            _ => {}
        }
        DatabaseError::Sqlx(err)
    }
}

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)",
    // user_id carries no foreign key: notes outlive their deleted owner
    r#"CREATE TABLE IF NOT EXISTS notes (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS notes_user_created_idx ON notes (user_id, created_at DESC)",
];

/// Connection pool setup and schema bootstrap for the Postgres backend
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against the configured database
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        Self::validate_url(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!("Connected to database at {}", Self::redacted_url(url));
        Ok(pool)
    }

    /// Create tables and indexes if they are missing
    pub async fn bootstrap(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(DatabaseError::classify)?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(DatabaseError::classify)?;
        Ok(())
    }

    fn validate_url(raw: &str) -> Result<(), DatabaseError> {
        let url = url::Url::parse(raw).map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(()),
            other => Err(DatabaseError::InvalidDatabaseUrl(format!(
                "unsupported scheme '{}'",
                other
            ))),
        }
    }

    /// Connection string with the password removed, for logging
    pub fn redacted_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}
