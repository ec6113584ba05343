use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use academy_core::ledger::{AttemptOutcome, GradedAttempt};
use academy_core::model::{SignupDraft, SubjectId, SubjectStatus, UserId, UserProfile};
use academy_core::time::fixed_now;
use services::{AppServices, Clock, ErrorKind, LessonService};
use storage::repository::{
    InMemoryRepository, SessionRepository, Storage, StorageError, UserRepository,
};

fn draft(name: &str) -> SignupDraft {
    SignupDraft {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        ..SignupDraft::default()
    }
}

async fn perfect_attempt(lessons: &LessonService, subject: SubjectId) -> GradedAttempt {
    let view = lessons.open_lesson(subject).await.unwrap();
    let answers: Vec<Option<usize>> = view
        .lesson
        .quiz
        .iter()
        .map(|q| Some(q.correct_option))
        .collect();
    lessons.grade_attempt(subject, &answers).await.unwrap()
}

#[tokio::test]
async fn finishing_javascript_levels_up_and_unlocks_react() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()));
    let accounts = app.accounts();
    let lessons = app.lessons();

    let user = accounts.sign_up(draft("Margaret")).await.unwrap();
    assert_eq!(user.level(), 1);

    let mut last = None;
    for n in 1..=5u8 {
        let attempt = perfect_attempt(&lessons, SubjectId::JavaScript).await;
        assert_eq!(attempt.lesson_number, n);
        let report = lessons.commit(&attempt).await.unwrap();
        assert!(report.collection_updated);
        last = Some(report);
    }

    let Some(report) = last else {
        panic!("no lessons committed");
    };
    let AttemptOutcome::Passed(pass) = report.outcome else {
        panic!("expected the fifth lesson to pass");
    };
    assert!(pass.subject_completed);
    assert!(pass.leveled_up);
    assert_eq!(pass.unlocked, Some(SubjectId::React));
    assert_eq!(pass.profile.total_xp(), 500);
    assert_eq!(pass.profile.level(), 2);

    let view = lessons.open_lesson(SubjectId::React).await.unwrap();
    assert_eq!(view.at.number, 1);

    let dashboard = app.progress().dashboard().await.unwrap();
    assert_eq!(dashboard.stats.completed_subjects, 1);
    assert_eq!(dashboard.subjects[0].status, SubjectStatus::Completed);
    assert!(dashboard.subjects[1].unlocked);
    assert!(!dashboard.subjects[2].unlocked);

    // Signing back in restores the stored record.
    accounts.log_out().await.unwrap();
    let again = accounts.log_in("margaret@example.com").await.unwrap();
    assert_eq!(again, pass.profile);
}

#[tokio::test]
async fn attempt_discarded_before_commit_leaves_progress_alone() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()));
    let user = app.accounts().sign_up(draft("Frances")).await.unwrap();

    let attempt = perfect_attempt(&app.lessons(), SubjectId::JavaScript).await;
    assert!(attempt.grade.passed);
    drop(attempt);

    assert_eq!(app.accounts().current_user().await.unwrap(), Some(user));
}

#[tokio::test]
async fn attempt_from_another_session_is_stale() {
    let mut clock = Clock::fixed(fixed_now());
    let first = AppServices::in_memory(clock);
    first.accounts().sign_up(draft("Hedy")).await.unwrap();
    let attempt = perfect_attempt(&first.lessons(), SubjectId::JavaScript).await;

    clock.advance(Duration::minutes(1));
    let storage = Storage::in_memory();
    let second = AppServices::from_storage(&storage, clock);
    let other = second.accounts().sign_up(draft("Radia")).await.unwrap();
    assert_eq!(other.created_at(), fixed_now() + Duration::minutes(1));

    let err = second.lessons().commit(&attempt).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

/// Collection that reads fine but refuses every write.
struct ReadOnlyUsers {
    users: Vec<UserProfile>,
}

#[async_trait]
impl UserRepository for ReadOnlyUsers {
    async fn load_all_users(&self) -> Result<Vec<UserProfile>, StorageError> {
        Ok(self.users.clone())
    }

    async fn save_all_users(&self, _users: &[UserProfile]) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }
}

#[tokio::test]
async fn failed_collection_write_keeps_session_untouched() {
    let user = draft("Mary")
        .validate(UserId::generate(), fixed_now())
        .unwrap();
    let sessions = InMemoryRepository::new();
    sessions.save_current_session(&user).await.unwrap();

    let storage = Storage {
        users: Arc::new(ReadOnlyUsers {
            users: vec![user.clone()],
        }),
        sessions: Arc::new(sessions.clone()),
    };
    let lessons = AppServices::from_storage(&storage, Clock::fixed(fixed_now())).lessons();
    let attempt = perfect_attempt(&lessons, SubjectId::JavaScript).await;

    let err = lessons.commit(&attempt).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(sessions.load_current_session().await.unwrap(), Some(user));
}
