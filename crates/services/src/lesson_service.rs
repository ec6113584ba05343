use std::sync::Arc;

use tracing::{debug, info, warn};

use academy_core::ledger::{self, AttemptOutcome, GradedAttempt, LedgerError};
use academy_core::model::{Lesson, LessonRef, SubjectId, SubjectProgress, UserProfile};
use storage::repository::{SessionRepository, UserRepository};

use crate::account_service::position_of;
use crate::error::LessonError;

/// The lesson a learner is about to study, with their standing in the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonView {
    pub at: LessonRef,
    pub lesson: &'static Lesson,
    pub total_lessons: u8,
    pub progress: SubjectProgress,
}

/// Result of committing a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub outcome: AttemptOutcome,
    /// `false` when the signed-in learner was missing from the user
    /// collection and only the session snapshot was written.
    pub collection_updated: bool,
}

/// Drives the study flow: open a lesson, grade its quiz, then commit.
///
/// Grading never writes; the caller decides when (or whether) to commit.
#[derive(Clone)]
pub struct LessonService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl LessonService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { users, sessions }
    }

    /// Current lesson for the signed-in learner in `subject`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NotSignedIn` without a session,
    /// `LedgerError::Locked` when the subject is not open yet, and
    /// `LedgerError::LessonNotFound` when no content exists for the lesson.
    pub async fn open_lesson(&self, subject: SubjectId) -> Result<LessonView, LessonError> {
        let profile = self.signed_in().await?;
        if !ledger::is_subject_unlocked(subject, profile.subject_progress()) {
            return Err(LedgerError::Locked(subject).into());
        }
        let (at, lesson) = ledger::current_lesson(&profile, subject)?;
        debug!(lesson = %at, "opened lesson");
        Ok(LessonView {
            at,
            lesson,
            total_lessons: subject.subject().total_lessons,
            progress: *profile.subject_progress().get(subject),
        })
    }

    /// Grade answers for the current lesson in `subject`. Nothing is stored.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open_lesson`].
    pub async fn grade_attempt(
        &self,
        subject: SubjectId,
        answers: &[Option<usize>],
    ) -> Result<GradedAttempt, LessonError> {
        let profile = self.signed_in().await?;
        let attempt = ledger::grade_attempt(&profile, subject, answers)?;
        debug!(
            lesson = %attempt.lesson(),
            score = attempt.grade.score,
            passed = attempt.grade.passed,
            "graded attempt"
        );
        Ok(attempt)
    }

    /// Apply a graded attempt to the signed-in learner.
    ///
    /// A failed attempt writes nothing. A passed one replaces the learner's
    /// record in the user collection and then the session snapshot. When the
    /// learner's id is not in the collection, only the session is written.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NotSignedIn` without a session,
    /// `LedgerError::StaleAttempt` when the attempt no longer matches the
    /// learner's current lesson, and `LessonError::Storage` if persistence
    /// fails.
    pub async fn commit(&self, attempt: &GradedAttempt) -> Result<CommitReport, LessonError> {
        let profile = self.signed_in().await?;
        let outcome = ledger::commit_attempt(&profile, attempt)?;

        let pass = match outcome {
            AttemptOutcome::Passed(pass) => pass,
            failed @ AttemptOutcome::Failed { .. } => {
                debug!(lesson = %attempt.lesson(), "failed attempt, nothing to store");
                return Ok(CommitReport {
                    outcome: failed,
                    collection_updated: false,
                });
            }
        };

        let mut users = self.users.load_all_users().await?;
        let collection_updated = match position_of(&users, pass.profile.id()) {
            Some(index) => {
                users[index] = pass.profile.clone();
                self.users.save_all_users(&users).await?;
                true
            }
            None => {
                warn!(
                    user_id = %pass.profile.id(),
                    "signed-in learner missing from user collection; updating session only"
                );
                false
            }
        };
        self.sessions.save_current_session(&pass.profile).await?;

        info!(
            user_id = %pass.profile.id(),
            lesson = %pass.lesson,
            total_xp = pass.profile.total_xp(),
            level = pass.profile.level(),
            leveled_up = pass.leveled_up,
            "lesson passed"
        );
        if let Some(next) = pass.unlocked {
            info!(subject = %next, "subject unlocked");
        }

        Ok(CommitReport {
            outcome: AttemptOutcome::Passed(pass),
            collection_updated,
        })
    }

    async fn signed_in(&self) -> Result<UserProfile, LessonError> {
        self.sessions
            .load_current_session()
            .await?
            .ok_or(LessonError::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use academy_core::model::{SignupDraft, UserId};
    use academy_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    use crate::error::ErrorKind;

    fn learner() -> UserProfile {
        SignupDraft {
            name: "Ken".into(),
            email: "ken@example.com".into(),
            ..SignupDraft::default()
        }
        .validate(UserId::generate(), fixed_now())
        .unwrap()
    }

    async fn seeded(register: bool) -> (InMemoryRepository, LessonService, UserProfile) {
        let repo = InMemoryRepository::new();
        let user = learner();
        if register {
            repo.save_all_users(std::slice::from_ref(&user))
                .await
                .unwrap();
        }
        repo.save_current_session(&user).await.unwrap();
        let svc = LessonService::new(Arc::new(repo.clone()), Arc::new(repo.clone()));
        (repo, svc, user)
    }

    async fn right_answers(svc: &LessonService, subject: SubjectId) -> Vec<Option<usize>> {
        let view = svc.open_lesson(subject).await.unwrap();
        view.lesson.quiz.iter().map(|q| Some(q.correct_option)).collect()
    }

    #[tokio::test]
    async fn open_lesson_requires_session() {
        let svc = LessonService::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
        );
        let err = svc.open_lesson(SubjectId::JavaScript).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn locked_subject_cannot_be_opened() {
        let (_, svc, _) = seeded(true).await;
        let err = svc.open_lesson(SubjectId::React).await.unwrap_err();
        assert!(matches!(
            err,
            LessonError::Ledger(LedgerError::Locked(SubjectId::React))
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn subject_without_content_is_not_found() {
        let (repo, svc, mut user) = seeded(true).await;
        for _ in 0..5 {
            user = ledger::apply_lesson_pass(&user, SubjectId::JavaScript)
                .unwrap()
                .profile;
        }
        // React ships a single lesson.
        user = ledger::apply_lesson_pass(&user, SubjectId::React)
            .unwrap()
            .profile;
        repo.save_current_session(&user).await.unwrap();

        let err = svc.open_lesson(SubjectId::React).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn grading_writes_nothing() {
        let (repo, svc, user) = seeded(true).await;
        let answers = right_answers(&svc, SubjectId::JavaScript).await;
        let attempt = svc
            .grade_attempt(SubjectId::JavaScript, &answers)
            .await
            .unwrap();
        assert!(attempt.grade.passed);
        assert_eq!(attempt.grade.score, 100);

        assert_eq!(repo.load_current_session().await.unwrap(), Some(user.clone()));
        assert_eq!(repo.load_all_users().await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn commit_pass_updates_collection_and_session() {
        let (repo, svc, _) = seeded(true).await;
        let answers = right_answers(&svc, SubjectId::JavaScript).await;
        let attempt = svc
            .grade_attempt(SubjectId::JavaScript, &answers)
            .await
            .unwrap();

        let report = svc.commit(&attempt).await.unwrap();
        assert!(report.collection_updated);
        let AttemptOutcome::Passed(pass) = report.outcome else {
            panic!("expected a pass");
        };
        assert_eq!(pass.xp_gained, 100);

        let session = repo.load_current_session().await.unwrap().unwrap();
        let stored = repo.load_all_users().await.unwrap();
        assert_eq!(session, pass.profile);
        assert_eq!(stored, vec![pass.profile]);
        assert_eq!(session.subject_progress().get(SubjectId::JavaScript).level(), 1);
    }

    #[tokio::test]
    async fn commit_failure_changes_nothing() {
        let (repo, svc, user) = seeded(true).await;
        let attempt = svc
            .grade_attempt(SubjectId::JavaScript, &[])
            .await
            .unwrap();
        assert!(!attempt.grade.passed);

        let report = svc.commit(&attempt).await.unwrap();
        assert!(matches!(report.outcome, AttemptOutcome::Failed { .. }));
        assert!(!report.collection_updated);
        assert_eq!(repo.load_current_session().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn committing_twice_is_rejected_as_stale() {
        let (repo, svc, _) = seeded(true).await;
        let answers = right_answers(&svc, SubjectId::JavaScript).await;
        let attempt = svc
            .grade_attempt(SubjectId::JavaScript, &answers)
            .await
            .unwrap();
        svc.commit(&attempt).await.unwrap();
        let after_first = repo.load_current_session().await.unwrap();

        let err = svc.commit(&attempt).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(repo.load_current_session().await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn missing_user_record_still_updates_session() {
        let (repo, svc, _) = seeded(false).await;
        let answers = right_answers(&svc, SubjectId::JavaScript).await;
        let attempt = svc
            .grade_attempt(SubjectId::JavaScript, &answers)
            .await
            .unwrap();

        let report = svc.commit(&attempt).await.unwrap();
        assert!(!report.collection_updated);
        assert!(repo.load_all_users().await.unwrap().is_empty());

        let session = repo.load_current_session().await.unwrap().unwrap();
        assert_eq!(session.total_xp(), 100);
    }
}
