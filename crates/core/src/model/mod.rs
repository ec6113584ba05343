mod ids;
mod lesson;
mod progress;
mod subject;
mod user;

pub use ids::{ParseIdError, UserId};
pub use lesson::{Lesson, LessonRef, QuizQuestion};
pub use progress::{ProgressError, SubjectProgress, SubjectProgressMap, SubjectStatus};
pub use subject::{LESSONS_PER_SUBJECT, SUBJECTS, Subject, SubjectError, SubjectId};
pub use user::{AVATARS, DEFAULT_AVATAR, SignupDraft, UserError, UserProfile};
