use serde::Serialize;

use crate::ledger;
use crate::leveling::{self, XP_PER_ACCOUNT_LEVEL};
use crate::model::{SubjectId, SubjectProgressMap, SubjectStatus, UserProfile};

/// One card on the learning path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectMapEntry {
    pub subject: SubjectId,
    pub name: &'static str,
    pub unlocked: bool,
    pub status: SubjectStatus,
    pub lessons_done: u8,
    pub total_lessons: u8,
    pub percent: u8,
}

/// Learning path for a learner, in catalog order.
#[must_use]
pub fn subject_map(progress: &SubjectProgressMap) -> Vec<SubjectMapEntry> {
    SubjectId::ALL
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let subject = id.subject();
            let p = progress.get(*id);
            SubjectMapEntry {
                subject: *id,
                name: subject.name,
                unlocked: ledger::is_unlocked(&SubjectId::ALL, index, progress),
                status: ledger::status_of(p),
                lessons_done: p.level(),
                total_lessons: subject.total_lessons,
                percent: rounded_percent(u32::from(p.level()), u32::from(subject.total_lessons)),
            }
        })
        .collect()
}

/// Headline numbers for the dashboard and profile pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub level: u32,
    pub next_level: u32,
    pub total_xp: u32,
    /// XP inside the current 500-point band.
    pub band_xp: u32,
    pub band_size: u32,
    pub completed_subjects: usize,
    pub total_subjects: usize,
    pub completion_rate: u8,
    pub overall_progress: u8,
}

impl ProfileStats {
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        let progress = profile.subject_progress();
        let completed_subjects = progress.iter().filter(|(_, p)| p.completed()).count();
        let total_subjects = SubjectId::COUNT;

        Self {
            level: profile.level(),
            next_level: profile.level().saturating_add(1),
            total_xp: profile.total_xp(),
            band_xp: leveling::xp_into_band(profile.total_xp()),
            band_size: XP_PER_ACCOUNT_LEVEL,
            completed_subjects,
            total_subjects,
            completion_rate: rounded_percent(
                u32::try_from(completed_subjects).unwrap_or(u32::MAX),
                u32::try_from(total_subjects).unwrap_or(u32::MAX),
            ),
            overall_progress: overall_progress(progress),
        }
    }
}

/// Mean per-subject completion: 100 for a completed subject, 20 per passed
/// lesson otherwise.
#[must_use]
pub fn overall_progress(progress: &SubjectProgressMap) -> u8 {
    let sum: u32 = progress
        .iter()
        .map(|(_, p)| {
            if p.completed() {
                100
            } else {
                u32::from(p.level()) * 20
            }
        })
        .sum();
    rounded_percent(sum, 100 * u32::try_from(SubjectId::COUNT).unwrap_or(u32::MAX))
}

fn rounded_percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let value = (u64::from(part) * 200 + u64::from(whole)) / (u64::from(whole) * 2);
    u8::try_from(value.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::apply_lesson_pass;
    use crate::model::{SignupDraft, UserId};
    use crate::time::fixed_now;

    fn learner() -> UserProfile {
        SignupDraft {
            name: "Linus".into(),
            email: "linus@example.com".into(),
            ..SignupDraft::default()
        }
        .validate(UserId::generate(), fixed_now())
        .unwrap()
    }

    #[test]
    fn fresh_profile_stats() {
        let stats = ProfileStats::from_profile(&learner());
        assert_eq!(stats.level, 1);
        assert_eq!(stats.next_level, 2);
        assert_eq!(stats.completed_subjects, 0);
        assert_eq!(stats.total_subjects, 7);
        assert_eq!(stats.overall_progress, 0);
        assert_eq!(stats.band_size, 500);
    }

    #[test]
    fn stats_after_finishing_javascript() {
        let mut user = learner();
        for _ in 0..5 {
            user = apply_lesson_pass(&user, SubjectId::JavaScript)
                .unwrap()
                .profile;
        }
        user = apply_lesson_pass(&user, SubjectId::React).unwrap().profile;

        let stats = ProfileStats::from_profile(&user);
        assert_eq!(stats.total_xp, 600);
        assert_eq!(stats.band_xp, 100);
        assert_eq!(stats.completed_subjects, 1);
        assert_eq!(stats.completion_rate, 14);
        // (100 + 20) / 7 = 17.14
        assert_eq!(stats.overall_progress, 17);

        let map = subject_map(user.subject_progress());
        assert_eq!(map.len(), 7);
        assert_eq!(map[0].status, SubjectStatus::Completed);
        assert_eq!(map[0].percent, 100);
        assert!(map[1].unlocked);
        assert_eq!(map[1].status, SubjectStatus::InProgress);
        assert_eq!(map[1].percent, 20);
        assert!(!map[2].unlocked);
        assert_eq!(map[2].status, SubjectStatus::Available);
    }
}
