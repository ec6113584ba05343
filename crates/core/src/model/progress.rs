use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::subject::{LESSONS_PER_SUBJECT, SubjectId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("subject level {0} exceeds 5")]
    LevelOutOfRange(u8),

    #[error("current lesson {0} must be between 1 and 5")]
    LessonOutOfRange(u8),

    #[error("current lesson {lesson} is ahead of level {level}")]
    LessonAheadOfLevel { level: u8, lesson: u8 },

    #[error("completed flag does not match level {0}")]
    CompletedMismatch(u8),
}

//
// ─── SUBJECT PROGRESS ──────────────────────────────────────────────────────────
//

/// Per-subject progress of one user.
///
/// Fields are only advanced by the ledger; everything else reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSubjectProgress", into = "RawSubjectProgress")]
pub struct SubjectProgress {
    level: u8,
    xp: u32,
    completed: bool,
    current_lesson: u8,
}

impl Default for SubjectProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectProgress {
    /// Zero progress: nothing passed, lesson 1 up next.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 0,
            xp: 0,
            completed: false,
            current_lesson: 1,
        }
    }

    /// Rehydrate a stored record, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record could not have been produced by
    /// lesson passes.
    pub fn from_persisted(
        level: u8,
        xp: u32,
        completed: bool,
        current_lesson: u8,
    ) -> Result<Self, ProgressError> {
        if level > LESSONS_PER_SUBJECT {
            return Err(ProgressError::LevelOutOfRange(level));
        }
        if !(1..=LESSONS_PER_SUBJECT).contains(&current_lesson) {
            return Err(ProgressError::LessonOutOfRange(current_lesson));
        }
        if current_lesson > level + 1 {
            return Err(ProgressError::LessonAheadOfLevel {
                level,
                lesson: current_lesson,
            });
        }
        if completed != (level >= LESSONS_PER_SUBJECT) {
            return Err(ProgressError::CompletedMismatch(level));
        }
        Ok(Self {
            level,
            xp,
            completed,
            current_lesson,
        })
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn current_lesson(&self) -> u8 {
        self.current_lesson
    }

    /// Record one passed lesson worth `xp_gained`.
    ///
    /// Level and current lesson are clamped at the subject size; XP is not.
    pub(crate) fn record_pass(&mut self, xp_gained: u32) {
        self.level = (self.level + 1).min(LESSONS_PER_SUBJECT);
        self.xp = self.xp.saturating_add(xp_gained);
        self.completed = self.level >= LESSONS_PER_SUBJECT;
        self.current_lesson = (self.current_lesson + 1).min(LESSONS_PER_SUBJECT);
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubjectProgress {
    level: u8,
    xp: u32,
    completed: bool,
    current_lesson: u8,
}

impl TryFrom<RawSubjectProgress> for SubjectProgress {
    type Error = ProgressError;

    fn try_from(raw: RawSubjectProgress) -> Result<Self, Self::Error> {
        Self::from_persisted(raw.level, raw.xp, raw.completed, raw.current_lesson)
    }
}

impl From<SubjectProgress> for RawSubjectProgress {
    fn from(p: SubjectProgress) -> Self {
        Self {
            level: p.level,
            xp: p.xp,
            completed: p.completed,
            current_lesson: p.current_lesson,
        }
    }
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Display classification of a subject, derived from its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectStatus {
    Available,
    InProgress,
    Completed,
}

impl SubjectStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubjectStatus::Available => "available",
            SubjectStatus::InProgress => "in-progress",
            SubjectStatus::Completed => "completed",
        }
    }
}

//
// ─── PROGRESS MAP ──────────────────────────────────────────────────────────────
//

/// Progress for every subject of the catalog; one slot per `SubjectId`.
///
/// Serialized as an object keyed by subject id. Subjects missing from stored
/// data come back as zero progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<SubjectId, SubjectProgress>",
    into = "BTreeMap<SubjectId, SubjectProgress>"
)]
pub struct SubjectProgressMap {
    slots: [SubjectProgress; SubjectId::COUNT],
}

impl SubjectProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, subject: SubjectId) -> &SubjectProgress {
        &self.slots[subject.index()]
    }

    pub(crate) fn get_mut(&mut self, subject: SubjectId) -> &mut SubjectProgress {
        &mut self.slots[subject.index()]
    }

    /// Place a rehydrated record into its slot.
    pub fn restore(&mut self, subject: SubjectId, progress: SubjectProgress) {
        self.slots[subject.index()] = progress;
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (SubjectId, &SubjectProgress)> {
        SubjectId::ALL.iter().map(move |id| (*id, self.get(*id)))
    }
}

impl From<BTreeMap<SubjectId, SubjectProgress>> for SubjectProgressMap {
    fn from(entries: BTreeMap<SubjectId, SubjectProgress>) -> Self {
        let mut map = Self::new();
        for (id, progress) in entries {
            map.restore(id, progress);
        }
        map
    }
}

impl From<SubjectProgressMap> for BTreeMap<SubjectId, SubjectProgress> {
    fn from(map: SubjectProgressMap) -> Self {
        map.iter().map(|(id, p)| (id, *p)).collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
