use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Note, UserRecord};
use crate::database::store::{NoteStore, Store, UserStore};

/// Process-local store used for development and tests.
///
/// Each call takes the lock once; nothing is held across a handler's
/// read-modify-write, so concurrent updates behave last-writer-wins like
/// the Postgres backend.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    notes: RwLock<HashMap<Uuid, Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &UserRecord) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(DatabaseError::Duplicate(format!("email '{}'", user.email)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn update_user(&self, user: &UserRecord) -> Result<bool, DatabaseError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email)
        {
            return Err(DatabaseError::Duplicate(format!("email '{}'", user.email)));
        }
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_notes(&self, owner: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let mut notes: Vec<Note> = self
            .notes
            .read()
            .await
            .values()
            .filter(|note| note.user_id == owner)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(notes)
    }

    async fn find_note(&self, id: Uuid, owner: Uuid) -> Result<Option<Note>, DatabaseError> {
        Ok(self
            .notes
            .read()
            .await
            .get(&id)
            .filter(|note| note.user_id == owner)
            .cloned())
    }

    async fn insert_note(&self, note: &Note) -> Result<(), DatabaseError> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(DatabaseError::Duplicate(format!("note id '{}'", note.id)));
        }
        notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn update_note(&self, note: &Note) -> Result<bool, DatabaseError> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&note.id) {
            Some(existing) if existing.user_id == note.user_id => {
                existing.title = note.title.clone();
                existing.content = note.content.clone();
                existing.updated_at = note.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_note(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let mut notes = self.notes.write().await;
        let owned = notes.get(&id).is_some_and(|note| note.user_id == owner);
        if owned {
            notes.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
