use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{self, MIN_PASSWORD_LENGTH};
use crate::auth::TokenService;
use crate::database::manager::DatabaseError;
use crate::database::models::user::{is_valid_email, normalize_email, normalize_name};
use crate::database::models::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User, UserRecord};
use crate::database::store::{Store, UserStore};
use crate::error::ApiError;

/// Registration, login and self-service account operations
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl CredentialService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create an account and issue its first token
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
        let mut field_errors = HashMap::new();

        let name = request.name.as_deref().map(normalize_name).unwrap_or_default();
        if name.is_empty() {
            field_errors.insert("name".to_string(), "Name is required".to_string());
        }

        let email = request.email.as_deref().map(normalize_email).unwrap_or_default();
        if let Err(problem) = check_email(&email) {
            field_errors.insert("email".to_string(), problem);
        }

        let raw_password = request.password.unwrap_or_default();
        if let Err(problem) = check_password(&raw_password) {
            field_errors.insert("password".to_string(), problem);
        }

        if !field_errors.is_empty() {
            return Err(ApiError::validation_error("Validation failed", Some(field_errors)));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            info!("Registration rejected: email already registered");
            return Err(ApiError::UserExists);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: password::hash_password_blocking(raw_password).await?,
            created_at: now,
            updated_at: now,
        };

        match self.store.insert_user(&record).await {
            Ok(()) => {}
            Err(DatabaseError::Duplicate(_)) => return Err(ApiError::UserExists),
            Err(e) => return Err(e.into()),
        }

        info!("Registered user {}", record.id);
        let token = self.tokens.issue(record.id)?;
        Ok(AuthResponse::new(&User::from(&record), token))
    }

    /// Check credentials. Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let email = request.email.as_deref().map(normalize_email).unwrap_or_default();
        let raw_password = request.password.unwrap_or_default();

        if email.is_empty() || raw_password.is_empty() {
            return Err(ApiError::validation_error(
                "Email and password are required",
                None,
            ));
        }

        let record = match self.store.find_user_by_email(&email).await? {
            Some(record) => record,
            None => {
                warn!("Login failed: unknown email");
                return Err(ApiError::InvalidCredentials);
            }
        };

        let matches = match password::verify_password_blocking(raw_password, record.password_hash.clone()).await {
            Ok(matches) => matches,
            Err(password::PasswordError::MalformedHash(msg)) => {
                warn!("Stored password hash for user {} is malformed: {}", record.id, msg);
                false
            }
            Err(e) => return Err(e.into()),
        };

        if !matches {
            warn!("Login failed: password mismatch for user {}", record.id);
            return Err(ApiError::InvalidCredentials);
        }

        info!("User {} logged in", record.id);
        let token = self.tokens.issue(record.id)?;
        Ok(AuthResponse::new(&User::from(&record), token))
    }

    /// Look up a user without the password hash
    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.store.find_user_by_id(id).await?.map(User::from))
    }

    /// Apply a partial profile update.
    ///
    /// The password hash is regenerated only when a new password is supplied.
    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, ApiError> {
        let mut record = self
            .store
            .find_user_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if let Some(name) = update.name.as_deref() {
            let name = normalize_name(name);
            if name.is_empty() {
                return Err(ApiError::invalid_field("name", "Name is required"));
            }
            record.name = name;
        }

        if let Some(email) = update.email.as_deref() {
            let email = normalize_email(email);
            check_email(&email).map_err(|problem| ApiError::invalid_field("email", problem))?;
            if email != record.email {
                if let Some(other) = self.store.find_user_by_email(&email).await? {
                    if other.id != record.id {
                        return Err(ApiError::UserExists);
                    }
                }
                record.email = email;
            }
        }

        if let Some(raw_password) = update.password {
            check_password(&raw_password).map_err(|problem| ApiError::invalid_field("password", problem))?;
            record.password_hash = password::hash_password_blocking(raw_password).await?;
        }

        record.updated_at = Utc::now();

        match self.store.update_user(&record).await {
            Ok(true) => Ok(User::from(record)),
            Ok(false) => Err(ApiError::UserNotFound),
            Err(DatabaseError::Duplicate(_)) => Err(ApiError::UserExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the account. Notes owned by it are left untouched.
    pub async fn delete_account(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.store.delete_user(id).await? {
            return Err(ApiError::UserNotFound);
        }
        info!("Deleted user {}", id);
        Ok(())
    }
}

fn check_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if !is_valid_email(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

fn check_password(raw: &str) -> Result<(), String> {
    if raw.is_empty() {
        return Err("Password is required".to_string());
    }
    if raw.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn service() -> (CredentialService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let tokens = TokenService::new("test-secret", 30).unwrap();
        (CredentialService::new(store.clone(), tokens), store)
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn register_normalizes_and_hashes() {
        let (svc, store) = service();
        let res = svc
            .register(register_request("  John  ", "  JOHN@X.com ", "secret12"))
            .await
            .unwrap();

        assert_eq!(res.name, "John");
        assert_eq!(res.email, "john@x.com");
        assert_eq!(svc.tokens().verify(&res.token).unwrap().id, res.id);

        let record = store.find_user_by_id(res.id).await.unwrap().unwrap();
        assert_ne!(record.password_hash, "secret12");
        assert!(password::verify_password("secret12", &record.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_in_any_case_is_rejected() {
        let (svc, _) = service();
        svc.register(register_request("A", "john@x.com", "secret12")).await.unwrap();

        let err = svc
            .register(register_request("B", "John@X.COM", "other-secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UserExists));
    }

    #[tokio::test]
    async fn short_password_and_missing_fields_are_validation_errors() {
        let (svc, _) = service();

        let err = svc.register(register_request("A", "a@x.com", "12345")).await.unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("password"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = svc.register(RegisterRequest::default()).await.unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (svc, _) = service();
        svc.register(register_request("A", "a@x.com", "secret12")).await.unwrap();

        let unknown = svc.login(login_request("nobody@x.com", "secret12")).await.unwrap_err();
        let wrong = svc.login(login_request("a@x.com", "wrong-pass")).await.unwrap_err();

        assert_eq!(unknown.status_code(), wrong.status_code());
        assert_eq!(unknown.to_json(), wrong.to_json());
    }

    #[tokio::test]
    async fn login_uses_normalized_email() {
        let (svc, _) = service();
        let registered = svc.register(register_request("A", "a@x.com", "secret12")).await.unwrap();

        let res = svc.login(login_request("  A@X.COM", "secret12")).await.unwrap();
        assert_eq!(res.id, registered.id);
    }

    #[tokio::test]
    async fn password_rehashed_only_when_modified() {
        let (svc, store) = service();
        let res = svc.register(register_request("John", "john@x.com", "secret12")).await.unwrap();
        let original = store.find_user_by_id(res.id).await.unwrap().unwrap().password_hash;

        let updated = svc
            .update_profile(
                res.id,
                ProfileUpdate {
                    name: Some("Jane".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Jane");
        let after_rename = store.find_user_by_id(res.id).await.unwrap().unwrap().password_hash;
        assert_eq!(after_rename, original);

        svc.update_profile(
            res.id,
            ProfileUpdate {
                password: Some("newpassword123".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let after_reset = store.find_user_by_id(res.id).await.unwrap().unwrap().password_hash;
        assert_ne!(after_reset, original);

        assert!(svc.login(login_request("john@x.com", "newpassword123")).await.is_ok());
        assert!(svc.login(login_request("john@x.com", "secret12")).await.is_err());
    }

    #[tokio::test]
    async fn profile_email_change_respects_uniqueness() {
        let (svc, _) = service();
        svc.register(register_request("A", "a@x.com", "secret12")).await.unwrap();
        let b = svc.register(register_request("B", "b@x.com", "secret12")).await.unwrap();

        let err = svc
            .update_profile(
                b.id,
                ProfileUpdate {
                    email: Some("A@x.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UserExists));
    }

    #[tokio::test]
    async fn deleted_account_no_longer_resolves() {
        let (svc, _) = service();
        let res = svc.register(register_request("A", "a@x.com", "secret12")).await.unwrap();

        svc.delete_account(res.id).await.unwrap();
        assert!(svc.find_user(res.id).await.unwrap().is_none());
        assert!(matches!(svc.delete_account(res.id).await, Err(ApiError::UserNotFound)));
    }
}
