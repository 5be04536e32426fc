use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Note, UserRecord};
use crate::database::store::{NoteStore, Store, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const NOTE_COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &UserRecord) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DatabaseError> {
        sqlx::query_as::<_, UserRecord>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::classify)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
        sqlx::query_as::<_, UserRecord>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::classify)
    }

    async fn update_user(&self, user: &UserRecord) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn list_notes(&self, owner: Uuid) -> Result<Vec<Note>, DatabaseError> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM notes WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            NOTE_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }

    async fn find_note(&self, id: Uuid, owner: Uuid) -> Result<Option<Note>, DatabaseError> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {} FROM notes WHERE id = $1 AND user_id = $2",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }

    async fn insert_note(&self, note: &Note) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO notes (id, user_id, title, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;
        Ok(())
    }

    async fn update_note(&self, note: &Note) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE notes SET title = $3, content = $4, updated_at = $5
             WHERE id = $1 AND user_id = $2",
        )
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_note(&self, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
