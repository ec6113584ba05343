use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;
use crate::model::progress::SubjectProgressMap;
use crate::model::subject::SubjectId;

/// Glyphs offered by the avatar picker.
pub const AVATARS: [&str; 5] = ["🤖", "👾", "🧙‍♂️", "🧙‍♀️", "🦾"];

/// Avatar assigned when the signup form leaves the picker untouched.
pub const DEFAULT_AVATAR: &str = "👨‍💻";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("account level must be at least 1")]
    InvalidLevel,
}

//
// ─── SIGNUP ────────────────────────────────────────────────────────────────────
//

/// Raw signup form input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignupDraft {
    pub name: String,
    pub email: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
}

impl SignupDraft {
    /// Validate the form and build a fresh profile.
    ///
    /// Name and email are required; the nickname falls back to the name and
    /// the avatar to [`DEFAULT_AVATAR`].
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyName` or `UserError::EmptyEmail` when a
    /// required field is blank.
    pub fn validate(self, id: UserId, now: DateTime<Utc>) -> Result<UserProfile, UserError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(UserError::EmptyName);
        }
        let email = self.email.trim().to_owned();
        if email.is_empty() {
            return Err(UserError::EmptyEmail);
        }

        let nickname = self
            .nickname
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| name.clone());
        let avatar = self
            .avatar
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_owned());

        Ok(UserProfile {
            id,
            name,
            nickname,
            email,
            avatar,
            total_xp: 0,
            level: 1,
            current_subject: SubjectId::JavaScript,
            subject_progress: SubjectProgressMap::new(),
            created_at: now,
        })
    }
}

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

/// A registered learner and their accumulated progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    id: UserId,
    name: String,
    nickname: String,
    email: String,
    avatar: String,
    #[serde(rename = "totalXP")]
    total_xp: u32,
    level: u32,
    current_subject: SubjectId,
    subject_progress: SubjectProgressMap,
    created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Rehydrate a stored profile.
    ///
    /// # Errors
    ///
    /// Returns `UserError` if identity fields are blank or the level is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: UserId,
        name: String,
        nickname: String,
        email: String,
        avatar: String,
        total_xp: u32,
        level: u32,
        current_subject: SubjectId,
        subject_progress: SubjectProgressMap,
        created_at: DateTime<Utc>,
    ) -> Result<Self, UserError> {
        if name.trim().is_empty() {
            return Err(UserError::EmptyName);
        }
        if email.trim().is_empty() {
            return Err(UserError::EmptyEmail);
        }
        if level == 0 {
            return Err(UserError::InvalidLevel);
        }
        Ok(Self {
            id,
            name,
            nickname,
            email,
            avatar,
            total_xp,
            level,
            current_subject,
            subject_progress,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    #[must_use]
    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Informational only; nothing gates on it.
    #[must_use]
    pub fn current_subject(&self) -> SubjectId {
        self.current_subject
    }

    #[must_use]
    pub fn subject_progress(&self) -> &SubjectProgressMap {
        &self.subject_progress
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn subject_progress_mut(&mut self) -> &mut SubjectProgressMap {
        &mut self.subject_progress
    }

    pub(crate) fn add_xp(&mut self, xp: u32) {
        self.total_xp = self.total_xp.saturating_add(xp);
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
