use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{CreateNoteRequest, Note, UpdateNoteRequest};
use crate::database::store::{NoteStore, Store};
use crate::error::ApiError;

/// Owner-scoped note operations.
///
/// Every lookup is keyed by `(note id, owner id)`, so a note belonging to
/// someone else is indistinguishable from one that does not exist.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn Store>,
}

impl NoteService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<Note>, ApiError> {
        Ok(self.store.list_notes(owner).await?)
    }

    pub async fn get(&self, raw_id: &str, owner: Uuid) -> Result<Note, ApiError> {
        let id = parse_note_id(raw_id)?;
        self.store
            .find_note(id, owner)
            .await?
            .ok_or(ApiError::NoteNotFound)
    }

    pub async fn create(&self, owner: Uuid, request: CreateNoteRequest) -> Result<Note, ApiError> {
        let title = normalize_title(request.title.as_deref().unwrap_or_default())?;
        let content = check_content(request.content.unwrap_or_default())?;

        let note = Note::new(owner, title, content);
        self.store.insert_note(&note).await?;
        debug!("Created note {} for user {}", note.id, owner);
        Ok(note)
    }

    /// Apply only the fields present in `patch`; always refreshes `updated_at`.
    ///
    /// No version check: concurrent updates are last-writer-wins.
    pub async fn update(&self, raw_id: &str, owner: Uuid, patch: UpdateNoteRequest) -> Result<Note, ApiError> {
        let id = parse_note_id(raw_id)?;
        let mut note = self
            .store
            .find_note(id, owner)
            .await?
            .ok_or(ApiError::NoteNotFound)?;

        if patch.is_empty() {
            debug!("Empty patch for note {}, refreshing updatedAt only", id);
        }
        if let Some(title) = patch.title.as_deref() {
            note.title = normalize_title(title)?;
        }
        if let Some(content) = patch.content {
            note.content = check_content(content)?;
        }
        note.updated_at = Utc::now();

        if !self.store.update_note(&note).await? {
            return Err(ApiError::NoteNotFound);
        }
        Ok(note)
    }

    pub async fn delete(&self, raw_id: &str, owner: Uuid) -> Result<(), ApiError> {
        let id = parse_note_id(raw_id)?;
        if !self.store.delete_note(id, owner).await? {
            return Err(ApiError::NoteNotFound);
        }
        debug!("Deleted note {} for user {}", id, owner);
        Ok(())
    }
}

/// Reject malformed ids before they reach the store
pub fn parse_note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::invalid_id(raw))
}

fn normalize_title(raw: &str) -> Result<String, ApiError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ApiError::invalid_field("title", "Title is required"));
    }
    Ok(title.to_string())
}

// Content keeps its whitespace but must have some non-whitespace text.
fn check_content(raw: String) -> Result<String, ApiError> {
    if raw.trim().is_empty() {
        return Err(ApiError::invalid_field("content", "Content is required"));
    }
    Ok(raw)
}
