use std::collections::HashMap;

use academy_core::model::{SubjectProgressMap, UserId, UserProfile};
use async_trait::async_trait;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{map_progress_row, map_user_row, user_id_from_str};
use crate::repository::{StorageError, UserRepository};

fn write_err(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn load_all_users(&self) -> Result<Vec<UserProfile>, StorageError> {
        let progress_rows = sqlx::query(
            r"
            SELECT user_id, subject, level, xp, completed, current_lesson
            FROM subject_progress
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut progress: HashMap<UserId, SubjectProgressMap> = HashMap::new();
        for row in &progress_rows {
            let (user_id, subject, record) = map_progress_row(row)?;
            progress
                .entry(user_id)
                .or_default()
                .restore(subject, record);
        }

        let user_rows = sqlx::query(
            r"
            SELECT
                id, name, nickname, email, avatar, total_xp, level, current_subject, created_at
            FROM users
            ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut users = Vec::with_capacity(user_rows.len());
        for row in &user_rows {
            let id: String = row
                .try_get("id")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let map = progress
                .remove(&user_id_from_str(&id)?)
                .unwrap_or_default();
            users.push(map_user_row(row, map)?);
        }
        Ok(users)
    }

    async fn save_all_users(&self, users: &[UserProfile]) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        // Progress rows go with their users via ON DELETE CASCADE.
        sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

        for (position, user) in users.iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            let id = user.id().to_string();

            sqlx::query(
                r"
                INSERT INTO users (
                    id, position, name, nickname, email, avatar,
                    total_xp, level, current_subject, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
            )
            .bind(&id)
            .bind(position)
            .bind(user.name())
            .bind(user.nickname())
            .bind(user.email())
            .bind(user.avatar())
            .bind(i64::from(user.total_xp()))
            .bind(i64::from(user.level()))
            .bind(user.current_subject().as_str())
            .bind(user.created_at())
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

            for (subject, progress) in user.subject_progress().iter() {
                sqlx::query(
                    r"
                    INSERT INTO subject_progress (
                        user_id, subject, level, xp, completed, current_lesson
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ",
                )
                .bind(&id)
                .bind(subject.as_str())
                .bind(i64::from(progress.level()))
                .bind(i64::from(progress.xp()))
                .bind(progress.completed())
                .bind(i64::from(progress.current_lesson()))
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        tracing::debug!(count = users.len(), "saved user collection");
        Ok(())
    }
}
