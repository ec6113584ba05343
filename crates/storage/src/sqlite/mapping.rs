use academy_core::model::{
    SubjectId, SubjectProgress, SubjectProgressMap, UserId, UserProfile,
};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn u8_from_i64(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn user_id_from_str(raw: &str) -> Result<UserId, StorageError> {
    raw.parse().map_err(ser)
}

pub(crate) fn subject_from_str(raw: &str) -> Result<SubjectId, StorageError> {
    raw.parse().map_err(ser)
}

/// Decode one `subject_progress` row into its subject and record.
pub(crate) fn map_progress_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<(UserId, SubjectId, SubjectProgress), StorageError> {
    let user_id = user_id_from_str(&row.try_get::<String, _>("user_id").map_err(ser)?)?;
    let subject = subject_from_str(&row.try_get::<String, _>("subject").map_err(ser)?)?;

    let progress = SubjectProgress::from_persisted(
        u8_from_i64("level", row.try_get("level").map_err(ser)?)?,
        u32_from_i64("xp", row.try_get("xp").map_err(ser)?)?,
        row.try_get::<bool, _>("completed").map_err(ser)?,
        u8_from_i64("current_lesson", row.try_get("current_lesson").map_err(ser)?)?,
    )
    .map_err(ser)?;

    Ok((user_id, subject, progress))
}

/// Decode one `users` row. Progress rows are attached separately; subjects
/// without a row stay at zero progress.
pub(crate) fn map_user_row(
    row: &sqlx::sqlite::SqliteRow,
    progress: SubjectProgressMap,
) -> Result<UserProfile, StorageError> {
    UserProfile::from_persisted(
        user_id_from_str(&row.try_get::<String, _>("id").map_err(ser)?)?,
        row.try_get("name").map_err(ser)?,
        row.try_get("nickname").map_err(ser)?,
        row.try_get("email").map_err(ser)?,
        row.try_get("avatar").map_err(ser)?,
        u32_from_i64("total_xp", row.try_get("total_xp").map_err(ser)?)?,
        u32_from_i64("level", row.try_get("level").map_err(ser)?)?,
        subject_from_str(&row.try_get::<String, _>("current_subject").map_err(ser)?)?,
        progress,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

/// Encode a session snapshot.
pub(crate) fn profile_to_json(user: &UserProfile) -> Result<String, StorageError> {
    serde_json::to_string(user).map_err(ser)
}

/// Decode a session snapshot.
pub(crate) fn profile_from_json(raw: &str) -> Result<UserProfile, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}
