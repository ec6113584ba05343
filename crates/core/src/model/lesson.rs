use crate::model::subject::SubjectId;

/// One multiple-choice question with a zero-based correct option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_option: usize,
}

impl QuizQuestion {
    #[must_use]
    pub const fn new(
        question: &'static str,
        options: &'static [&'static str],
        correct_option: usize,
    ) -> Self {
        Self {
            question,
            options,
            correct_option,
        }
    }
}

/// Read-only lesson content with its embedded quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub title: &'static str,
    pub concept: &'static str,
    pub explanation: &'static str,
    pub motivation: &'static str,
    pub code_example: &'static str,
    pub key_points: &'static [&'static str],
    pub quiz: &'static [QuizQuestion],
}

/// Address of a lesson: subject plus 1-based lesson number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonRef {
    pub subject: SubjectId,
    pub number: u8,
}

impl LessonRef {
    #[must_use]
    pub fn new(subject: SubjectId, number: u8) -> Self {
        Self { subject, number }
    }
}

impl std::fmt::Display for LessonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lesson {}", self.subject, self.number)
    }
}
