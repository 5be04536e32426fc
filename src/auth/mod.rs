pub mod cookie;
pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Identity carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(id: Uuid, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            id,
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret is not configured")]
    MissingSecret,
    #[error("JWT generation error: {0}")]
    Generation(String),
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies signed, time-limited identity tokens.
///
/// Verification is purely cryptographic and never touches a store.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime_days", &self.lifetime.num_days())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, lifetime_days: i64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::days(lifetime_days),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_days)
    }

    /// Sign a token for `user_id` issued now
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, issued_at, self.lifetime);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    pub fn lifetime_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}
