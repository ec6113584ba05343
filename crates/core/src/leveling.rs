use crate::model::{SubjectId, SubjectProgressMap};

/// XP awarded for every passed lesson, including re-passes of a finished subject.
pub const XP_PER_LESSON: u32 = 100;

/// Account level `n` is left once total XP reaches `n * XP_PER_ACCOUNT_LEVEL`.
pub const XP_PER_ACCOUNT_LEVEL: u32 = 500;

/// XP total at which `level` advances.
#[must_use]
pub fn threshold(level: u32) -> u32 {
    level.saturating_mul(XP_PER_ACCOUNT_LEVEL)
}

/// Account level after one XP award.
///
/// Checked once per award against the current level's threshold, so a single
/// award moves the level by at most one even when it clears several
/// thresholds. This is not `total_xp / 500 + 1`.
#[must_use]
pub fn level_after_award(level: u32, total_xp_after: u32) -> u32 {
    if total_xp_after >= threshold(level) {
        level.saturating_add(1)
    } else {
        level
    }
}

/// XP earned inside the current 500-point band, for progress bars.
#[must_use]
pub fn xp_into_band(total_xp: u32) -> u32 {
    total_xp % XP_PER_ACCOUNT_LEVEL
}

/// The subject that opens because `subject` just became completed.
///
/// Returns `None` when `subject` was already completed before the award, is
/// still incomplete, or is last in the chain.
#[must_use]
pub fn newly_unlocked(
    subject: SubjectId,
    before: &SubjectProgressMap,
    after: &SubjectProgressMap,
) -> Option<SubjectId> {
    let was = before.get(subject).completed();
    let is = after.get(subject).completed();
    if !was && is { subject.next() } else { None }
}
