use academy_core::model::UserProfile;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{profile_from_json, profile_to_json};
use crate::repository::{SessionRepository, StorageError};

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn load_current_session(&self) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query("SELECT profile_json FROM current_session WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row
            .try_get("profile_json")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        profile_from_json(&raw).map(Some)
    }

    async fn save_current_session(&self, user: &UserProfile) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO current_session (id, profile_json, saved_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                profile_json = excluded.profile_json,
                saved_at = excluded.saved_at
            ",
        )
        .bind(profile_to_json(user)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn clear_current_session(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM current_session")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
