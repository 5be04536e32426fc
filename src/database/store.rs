use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Note, UserRecord};

/// Credential store: user records keyed by id, unique by normalized email
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `DatabaseError::Duplicate` if the email is taken.
    async fn insert_user(&self, user: &UserRecord) -> Result<(), DatabaseError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError>;

    /// Overwrite a user row. Returns false if the user no longer exists.
    async fn update_user(&self, user: &UserRecord) -> Result<bool, DatabaseError>;

    /// Remove a user row; owned notes are left in place
    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

/// Note store. Every single-note predicate includes the owner id.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Owner's notes, newest first
    async fn list_notes(&self, owner: Uuid) -> Result<Vec<Note>, DatabaseError>;

    async fn find_note(&self, id: Uuid, owner: Uuid) -> Result<Option<Note>, DatabaseError>;

    async fn insert_note(&self, note: &Note) -> Result<(), DatabaseError>;

    /// Overwrite title, content and updated_at where `(note.id, note.user_id)` matches
    async fn update_note(&self, note: &Note) -> Result<bool, DatabaseError>;

    async fn delete_note(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError>;
}

/// A complete backend serving both stores
#[async_trait]
pub trait Store: UserStore + NoteStore {
    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
