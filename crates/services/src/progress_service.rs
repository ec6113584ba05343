use std::sync::Arc;

use serde::Serialize;

use academy_core::model::UserProfile;
use academy_core::stats::{self, ProfileStats, SubjectMapEntry};
use storage::repository::SessionRepository;

use crate::error::ProgressViewError;

/// Everything the dashboard shows for the signed-in learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub user: UserProfile,
    pub stats: ProfileStats,
    pub subjects: Vec<SubjectMapEntry>,
}

impl DashboardView {
    #[must_use]
    pub fn from_profile(user: UserProfile) -> Self {
        let stats = ProfileStats::from_profile(&user);
        let subjects = stats::subject_map(user.subject_progress());
        Self {
            user,
            stats,
            subjects,
        }
    }
}

/// Read-only views over the session snapshot.
#[derive(Clone)]
pub struct ProgressService {
    sessions: Arc<dyn SessionRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// # Errors
    ///
    /// Returns `ProgressViewError::NotSignedIn` without a session and
    /// `ProgressViewError::Storage` if it cannot be read.
    pub async fn dashboard(&self) -> Result<DashboardView, ProgressViewError> {
        let user = self
            .sessions
            .load_current_session()
            .await?
            .ok_or(ProgressViewError::NotSignedIn)?;
        Ok(DashboardView::from_profile(user))
    }

    /// The learning path alone.
    ///
    /// # Errors
    ///
    /// Same as [`Self::dashboard`].
    pub async fn subject_map(&self) -> Result<Vec<SubjectMapEntry>, ProgressViewError> {
        Ok(self.dashboard().await?.subjects)
    }
}
