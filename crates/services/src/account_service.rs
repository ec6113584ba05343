use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use academy_core::model::{SignupDraft, UserId, UserProfile};
use academy_core::stats;
use storage::repository::{SessionRepository, UserRepository};

use crate::error::AccountError;
use crate::Clock;

/// One row in the learner search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub nickname: String,
    pub avatar: String,
    pub level: u32,
    pub total_xp: u32,
    pub overall_progress: u8,
}

impl UserSummary {
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id(),
            name: profile.name().to_owned(),
            nickname: profile.nickname().to_owned(),
            avatar: profile.avatar().to_owned(),
            level: profile.level(),
            total_xp: profile.total_xp(),
            overall_progress: stats::overall_progress(profile.subject_progress()),
        }
    }
}

/// Sign-up, sign-in, and learner lookup.
#[derive(Clone)]
pub struct AccountService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl AccountService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            clock,
            users,
            sessions,
        }
    }

    /// Register a new learner and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for a blank name or email,
    /// `AccountError::EmailTaken` when the email is already registered (exact
    /// match), and `AccountError::Storage` if persistence fails.
    pub async fn sign_up(&self, draft: SignupDraft) -> Result<UserProfile, AccountError> {
        let profile = draft.validate(UserId::generate(), self.clock.now())?;

        let mut users = self.users.load_all_users().await?;
        if find_by_email(&users, profile.email()).is_some() {
            return Err(AccountError::EmailTaken(profile.email().to_owned()));
        }

        users.push(profile.clone());
        self.users.save_all_users(&users).await?;
        self.sessions.save_current_session(&profile).await?;

        info!(user_id = %profile.id(), "signed up");
        Ok(profile)
    }

    /// Sign in by email. The match is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UnknownEmail` when no account matches and
    /// `AccountError::Storage` if repository access fails.
    pub async fn log_in(&self, email: &str) -> Result<UserProfile, AccountError> {
        let email = email.trim();
        let users = self.users.load_all_users().await?;
        let profile = find_by_email(&users, email)
            .cloned()
            .ok_or_else(|| AccountError::UnknownEmail(email.to_owned()))?;

        self.sessions.save_current_session(&profile).await?;
        info!(user_id = %profile.id(), "signed in");
        Ok(profile)
    }

    /// Forget the signed-in learner. Signing out twice is fine.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the session cannot be cleared.
    pub async fn log_out(&self) -> Result<(), AccountError> {
        self.sessions.clear_current_session().await?;
        info!("signed out");
        Ok(())
    }

    /// The restored session, if any.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the session cannot be read.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, AccountError> {
        Ok(self.sessions.load_current_session().await?)
    }

    /// Like [`Self::current_user`], but a missing session is an error.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotSignedIn` when nobody is signed in.
    pub async fn require_user(&self) -> Result<UserProfile, AccountError> {
        self.current_user().await?.ok_or(AccountError::NotSignedIn)
    }

    /// Find other learners whose name or nickname contains `term`,
    /// ignoring case. A blank term matches nobody.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotSignedIn` when nobody is signed in and
    /// `AccountError::Storage` if repository access fails.
    pub async fn search(&self, term: &str) -> Result<Vec<UserSummary>, AccountError> {
        let me = self.require_user().await?;
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.users.load_all_users().await?;
        let hits: Vec<UserSummary> = users
            .iter()
            .filter(|u| u.id() != me.id())
            .filter(|u| {
                u.name().to_lowercase().contains(&needle)
                    || u.nickname().to_lowercase().contains(&needle)
            })
            .map(UserSummary::from_profile)
            .collect();

        debug!(term = %needle, hits = hits.len(), "user search");
        Ok(hits)
    }
}

/// First profile whose email equals `email` exactly.
#[must_use]
pub fn find_by_email<'a>(users: &'a [UserProfile], email: &str) -> Option<&'a UserProfile> {
    users.iter().find(|u| u.email() == email)
}

/// Position of the profile with `id` in the collection.
#[must_use]
pub fn position_of(users: &[UserProfile], id: UserId) -> Option<usize> {
    users.iter().position(|u| u.id() == id)
}
