use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog;
use crate::grader::{self, QuizGrade};
use crate::leveling::{self, XP_PER_LESSON};
use crate::model::{
    Lesson, LessonRef, SubjectId, SubjectProgress, SubjectProgressMap, SubjectStatus, UserId,
    UserProfile,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("lesson not found: {0}")]
    LessonNotFound(LessonRef),

    #[error("subject {0} is locked")]
    Locked(SubjectId),

    #[error("attempt for {attempt} no longer matches the learner's progress")]
    StaleAttempt { attempt: LessonRef },
}

//
// ─── UNLOCK & STATUS ───────────────────────────────────────────────────────────
//

/// Whether `subjects[index]` is open for `progress`.
///
/// The first subject is always open; any other opens only when its immediate
/// predecessor in `subjects` is completed. An index outside `subjects` is
/// treated as locked.
#[must_use]
pub fn is_unlocked(subjects: &[SubjectId], index: usize, progress: &SubjectProgressMap) -> bool {
    if index >= subjects.len() {
        return false;
    }
    match index.checked_sub(1) {
        None => true,
        Some(prev) => subjects
            .get(prev)
            .is_some_and(|id| progress.get(*id).completed()),
    }
}

/// Catalog-order shorthand for [`is_unlocked`].
#[must_use]
pub fn is_subject_unlocked(subject: SubjectId, progress: &SubjectProgressMap) -> bool {
    is_unlocked(&SubjectId::ALL, subject.index(), progress)
}

/// Classify a subject. Completion wins over partial progress.
#[must_use]
pub fn status_of(progress: &SubjectProgress) -> SubjectStatus {
    if progress.completed() {
        SubjectStatus::Completed
    } else if progress.level() > 0 {
        SubjectStatus::InProgress
    } else {
        SubjectStatus::Available
    }
}

/// The lesson a learner would take next in `subject`.
#[must_use]
pub fn current_lesson_ref(profile: &UserProfile, subject: SubjectId) -> LessonRef {
    LessonRef::new(
        subject,
        profile.subject_progress().get(subject).current_lesson(),
    )
}

/// Resolve the content of the learner's current lesson in `subject`.
///
/// # Errors
///
/// Returns `LedgerError::LessonNotFound` when the catalog has no content for it.
pub fn current_lesson(
    profile: &UserProfile,
    subject: SubjectId,
) -> Result<(LessonRef, &'static Lesson), LedgerError> {
    let at = current_lesson_ref(profile, subject);
    catalog::lesson(at)
        .map(|lesson| (at, lesson))
        .ok_or(LedgerError::LessonNotFound(at))
}

//
// ─── LESSON PASS ───────────────────────────────────────────────────────────────
//

/// Effect of one lesson pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonPass {
    pub profile: UserProfile,
    pub lesson: LessonRef,
    pub xp_gained: u32,
    pub leveled_up: bool,
    pub subject_completed: bool,
    pub unlocked: Option<SubjectId>,
}

/// Apply a passed quiz for the learner's current lesson in `subject`.
///
/// Returns an updated copy; `profile` itself is untouched, so callers either
/// take every field of the result or none of it.
///
/// # Errors
///
/// Returns `LedgerError::LessonNotFound` when the current lesson has no content.
pub fn apply_lesson_pass(
    profile: &UserProfile,
    subject: SubjectId,
) -> Result<LessonPass, LedgerError> {
    let (at, _) = current_lesson(profile, subject)?;

    let mut updated = profile.clone();
    let xp_gained = XP_PER_LESSON;

    updated
        .subject_progress_mut()
        .get_mut(subject)
        .record_pass(xp_gained);
    updated.add_xp(xp_gained);

    let level = leveling::level_after_award(updated.level(), updated.total_xp());
    let leveled_up = level != updated.level();
    updated.set_level(level);

    let subject_completed = updated.subject_progress().get(subject).completed();
    let unlocked = leveling::newly_unlocked(
        subject,
        profile.subject_progress(),
        updated.subject_progress(),
    );

    Ok(LessonPass {
        profile: updated,
        lesson: at,
        xp_gained,
        leveled_up,
        subject_completed,
        unlocked,
    })
}

//
// ─── TWO-PHASE ATTEMPT ─────────────────────────────────────────────────────────
//

/// A graded quiz that has not been applied yet.
///
/// Dropping it discards the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedAttempt {
    pub user_id: UserId,
    pub subject: SubjectId,
    pub lesson_number: u8,
    pub grade: QuizGrade,
}

impl GradedAttempt {
    #[must_use]
    pub fn lesson(&self) -> LessonRef {
        LessonRef::new(self.subject, self.lesson_number)
    }
}

/// Outcome of committing a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Passed(LessonPass),
    Failed { grade: QuizGrade },
}

/// Grade answers for the learner's current lesson in `subject` without
/// changing anything.
///
/// # Errors
///
/// Returns `LedgerError::Locked` when the subject is not open yet and
/// `LedgerError::LessonNotFound` when the lesson has no content.
pub fn grade_attempt(
    profile: &UserProfile,
    subject: SubjectId,
    answers: &[Option<usize>],
) -> Result<GradedAttempt, LedgerError> {
    if !is_subject_unlocked(subject, profile.subject_progress()) {
        return Err(LedgerError::Locked(subject));
    }
    let (at, lesson) = current_lesson(profile, subject)?;
    Ok(GradedAttempt {
        user_id: profile.id(),
        subject,
        lesson_number: at.number,
        grade: grader::grade(lesson.quiz, answers),
    })
}

/// Apply a previously graded attempt to `profile`.
///
/// A failed attempt changes nothing. A passed attempt is applied only if it
/// still belongs to this learner's current lesson.
///
/// # Errors
///
/// Returns `LedgerError::StaleAttempt` when the attempt was graded for another
/// user or lesson, or `LedgerError::LessonNotFound` as in [`apply_lesson_pass`].
pub fn commit_attempt(
    profile: &UserProfile,
    attempt: &GradedAttempt,
) -> Result<AttemptOutcome, LedgerError> {
    let current = current_lesson_ref(profile, attempt.subject);
    if attempt.user_id != profile.id() || current != attempt.lesson() {
        return Err(LedgerError::StaleAttempt {
            attempt: attempt.lesson(),
        });
    }
    if !attempt.grade.passed {
        return Ok(AttemptOutcome::Failed {
            grade: attempt.grade,
        });
    }
    apply_lesson_pass(profile, attempt.subject).map(AttemptOutcome::Passed)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SignupDraft;
    use crate::time::fixed_now;

    fn learner() -> UserProfile {
        SignupDraft {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            ..SignupDraft::default()
        }
        .validate(UserId::generate(), fixed_now())
        .unwrap()
    }

    fn pass_n(mut user: UserProfile, subject: SubjectId, n: usize) -> UserProfile {
        for _ in 0..n {
            user = apply_lesson_pass(&user, subject).unwrap().profile;
        }
        user
    }

    fn correct_answers(profile: &UserProfile, subject: SubjectId) -> Vec<Option<usize>> {
        let (_, lesson) = current_lesson(profile, subject).unwrap();
        lesson.quiz.iter().map(|q| Some(q.correct_option)).collect()
    }

    #[test]
    fn first_subject_always_unlocked() {
        let progress = SubjectProgressMap::new();
        assert!(is_unlocked(&SubjectId::ALL, 0, &progress));
        for i in 1..SubjectId::COUNT {
            assert!(!is_unlocked(&SubjectId::ALL, i, &progress));
        }
    }

    #[test]
    fn unlock_follows_predecessor_completion() {
        let user = pass_n(learner(), SubjectId::JavaScript, 5);
        let progress = user.subject_progress();
        assert!(is_unlocked(&SubjectId::ALL, 1, progress));
        assert!(!is_unlocked(&SubjectId::ALL, 2, progress));
        assert!(is_subject_unlocked(SubjectId::React, progress));
    }

    #[test]
    fn out_of_range_index_is_locked() {
        let progress = SubjectProgressMap::new();
        assert!(!is_unlocked(&SubjectId::ALL, SubjectId::COUNT, &progress));
        assert!(!is_unlocked(&[], 0, &progress));
    }

    #[test]
    fn status_priority() {
        let mut p = SubjectProgress::new();
        assert_eq!(status_of(&p), SubjectStatus::Available);
        p.record_pass(XP_PER_LESSON);
        assert_eq!(status_of(&p), SubjectStatus::InProgress);
        for _ in 0..4 {
            p.record_pass(XP_PER_LESSON);
        }
        assert_eq!(status_of(&p), SubjectStatus::Completed);
    }

    #[test]
    fn pass_advances_every_field_together() {
        let user = learner();
        let pass = apply_lesson_pass(&user, SubjectId::JavaScript).unwrap();
        let p = pass.profile.subject_progress().get(SubjectId::JavaScript);

        assert_eq!(pass.xp_gained, 100);
        assert_eq!(p.level(), 1);
        assert_eq!(p.xp(), 100);
        assert_eq!(p.current_lesson(), 2);
        assert!(!p.completed());
        assert_eq!(pass.profile.total_xp(), 100);
        assert_eq!(pass.profile.level(), 1);
        assert!(!pass.leveled_up);
        assert_eq!(pass.lesson, LessonRef::new(SubjectId::JavaScript, 1));
        // Input untouched.
        assert_eq!(user.total_xp(), 0);
    }

    #[test]
    fn fifth_pass_completes_and_unlocks_next() {
        let user = pass_n(learner(), SubjectId::JavaScript, 4);
        let pass = apply_lesson_pass(&user, SubjectId::JavaScript).unwrap();
        assert!(pass.subject_completed);
        assert_eq!(pass.unlocked, Some(SubjectId::React));
        assert!(pass.leveled_up);
        assert_eq!(pass.profile.total_xp(), 500);
        assert_eq!(pass.profile.level(), 2);
    }

    #[test]
    fn pass_after_completion_only_adds_xp() {
        let done = pass_n(learner(), SubjectId::JavaScript, 5);
        let pass = apply_lesson_pass(&done, SubjectId::JavaScript).unwrap();
        let p = pass.profile.subject_progress().get(SubjectId::JavaScript);
        assert_eq!(p.level(), 5);
        assert_eq!(p.current_lesson(), 5);
        assert_eq!(p.xp(), 600);
        assert!(p.completed());
        assert_eq!(pass.unlocked, None);
        assert_eq!(pass.profile.total_xp(), 600);
    }

    #[test]
    fn pass_never_decreases_anything() {
        let mut user = learner();
        for _ in 0..8 {
            let before = *user.subject_progress().get(SubjectId::JavaScript);
            let next = apply_lesson_pass(&user, SubjectId::JavaScript)
                .unwrap()
                .profile;
            let after = next.subject_progress().get(SubjectId::JavaScript);
            assert!(after.level() >= before.level());
            assert!(after.xp() >= before.xp());
            assert!(after.current_lesson() >= before.current_lesson());
            assert_eq!(after.completed(), after.level() >= 5);
            assert!(next.total_xp() >= user.total_xp());
            user = next;
        }
    }

    #[test]
    fn missing_content_is_a_no_op_error() {
        let user = learner();
        let err = apply_lesson_pass(&user, SubjectId::Java).unwrap_err();
        assert_eq!(
            err,
            LedgerError::LessonNotFound(LessonRef::new(SubjectId::Java, 1))
        );

        let js_done = pass_n(learner(), SubjectId::JavaScript, 5);
        let react_once = pass_n(js_done, SubjectId::React, 1);
        let err = apply_lesson_pass(&react_once, SubjectId::React).unwrap_err();
        assert_eq!(
            err,
            LedgerError::LessonNotFound(LessonRef::new(SubjectId::React, 2))
        );
    }

    #[test]
    fn grading_locked_subject_is_rejected() {
        let err = grade_attempt(&learner(), SubjectId::React, &[]).unwrap_err();
        assert_eq!(err, LedgerError::Locked(SubjectId::React));
    }

    #[test]
    fn passed_attempt_commits() {
        let user = learner();
        let answers = correct_answers(&user, SubjectId::JavaScript);
        let attempt = grade_attempt(&user, SubjectId::JavaScript, &answers).unwrap();
        assert_eq!(attempt.grade.score, 100);

        match commit_attempt(&user, &attempt).unwrap() {
            AttemptOutcome::Passed(pass) => assert_eq!(pass.profile.total_xp(), 100),
            AttemptOutcome::Failed { .. } => panic!("expected pass"),
        }
    }

    #[test]
    fn failed_attempt_changes_nothing() {
        let user = learner();
        let attempt = grade_attempt(&user, SubjectId::JavaScript, &[None; 5]).unwrap();
        assert_eq!(
            commit_attempt(&user, &attempt).unwrap(),
            AttemptOutcome::Failed {
                grade: attempt.grade
            }
        );
    }

    #[test]
    fn stale_attempt_is_rejected() {
        let user = learner();
        let answers = correct_answers(&user, SubjectId::JavaScript);
        let attempt = grade_attempt(&user, SubjectId::JavaScript, &answers).unwrap();
        let moved_on = pass_n(user, SubjectId::JavaScript, 1);

        let err = commit_attempt(&moved_on, &attempt).unwrap_err();
        assert_eq!(
            err,
            LedgerError::StaleAttempt {
                attempt: LessonRef::new(SubjectId::JavaScript, 1)
            }
        );

        let other = learner();
        assert!(commit_attempt(&other, &attempt).is_err());
    }
}
