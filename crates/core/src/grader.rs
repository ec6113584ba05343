use serde::{Deserialize, Serialize};

use crate::model::QuizQuestion;

/// Minimum percentage needed to pass a quiz.
pub const PASSING_SCORE: u8 = 80;

//
// ─── QUIZ GRADE ────────────────────────────────────────────────────────────────
//

/// Result of grading one quiz attempt.
///
/// # Examples
///
/// ```
/// # use academy_core::grader::grade;
/// # use academy_core::model::QuizQuestion;
/// let quiz = [
///     QuizQuestion::new("2 + 2?", &["3", "4"], 1),
///     QuizQuestion::new("3 + 3?", &["6", "7"], 0),
/// ];
/// let result = grade(&quiz, &[Some(1), None]);
/// assert_eq!(result.score, 50);
/// assert!(!result.passed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizGrade {
    /// Rounded percentage, 0-100.
    pub score: u8,
    pub correct: usize,
    pub total: usize,
    pub passed: bool,
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Score `answers` against `questions`, position by position.
///
/// The i-th answer is graded against the i-th question. A question counts as
/// correct only when its answer is `Some` and equals the answer key; missing
/// or `None` answers stay in the denominator. Answers past the last question
/// are ignored. An empty quiz scores 0 and fails.
#[must_use]
pub fn grade(questions: &[QuizQuestion], answers: &[Option<usize>]) -> QuizGrade {
    let total = questions.len();
    if total == 0 {
        return QuizGrade {
            score: 0,
            correct: 0,
            total: 0,
            passed: false,
        };
    }

    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).copied().flatten() == Some(q.correct_option))
        .count();

    let score = percent(correct, total);
    QuizGrade {
        score,
        correct,
        total,
        passed: score >= PASSING_SCORE,
    }
}

/// `round(100 * part / whole)` with halves rounded up, in integer arithmetic.
fn percent(part: usize, whole: usize) -> u8 {
    let rounded = (200 * part + whole) / (2 * whole);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: &[&str] = &["a", "b", "c", "d"];

    fn quiz(key: &[usize]) -> Vec<QuizQuestion> {
        key.iter()
            .map(|k| QuizQuestion::new("q", OPTIONS, *k))
            .collect()
    }

    fn answers(raw: &[usize]) -> Vec<Option<usize>> {
        raw.iter().copied().map(Some).collect()
    }

    #[test]
    fn all_correct_scores_100() {
        let q = quiz(&[1, 2, 0, 3, 1]);
        let g = grade(&q, &answers(&[1, 2, 0, 3, 1]));
        assert_eq!(g.score, 100);
        assert_eq!(g.correct, 5);
        assert!(g.passed);
    }

    #[test]
    fn four_of_five_passes_at_threshold() {
        let q = quiz(&[1, 2, 0, 3, 1]);
        let g = grade(&q, &answers(&[1, 2, 0, 3, 0]));
        assert_eq!(g.score, 80);
        assert!(g.passed);
    }

    #[test]
    fn one_of_five_fails() {
        let q = quiz(&[1, 2, 0, 3, 1]);
        let g = grade(&q, &answers(&[0, 0, 0, 0, 0]));
        assert_eq!(g.correct, 1);
        assert_eq!(g.score, 20);
        assert!(!g.passed);
    }

    #[test]
    fn empty_quiz_scores_zero_and_fails() {
        let g = grade(&[], &answers(&[1, 2]));
        assert_eq!(g.score, 0);
        assert_eq!(g.total, 0);
        assert!(!g.passed);
    }

    #[test]
    fn unanswered_questions_count_against_score() {
        let q = quiz(&[1, 2, 0, 3, 1]);
        let g = grade(&q, &[Some(1), None, Some(0), Some(3), Some(1)]);
        assert_eq!(g.score, 80);
        assert_eq!(g.total, 5);

        let short = grade(&q, &answers(&[1, 2, 0]));
        assert_eq!(short.correct, 3);
        assert_eq!(short.score, 60);
        assert!(!short.passed);
    }

    #[test]
    fn grading_is_positional() {
        let q = quiz(&[0, 1]);
        let g = grade(&q, &answers(&[1, 0]));
        assert_eq!(g.correct, 0);
    }

    #[test]
    fn extra_answers_are_ignored() {
        let q = quiz(&[0]);
        let g = grade(&q, &answers(&[0, 3, 3]));
        assert_eq!(g.score, 100);
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 4), 0);
    }

    #[test]
    fn grading_twice_gives_same_result() {
        let q = quiz(&[3, 1, 2]);
        let a = vec![Some(3), None, Some(2)];
        assert_eq!(grade(&q, &a), grade(&q, &a));
    }
}
