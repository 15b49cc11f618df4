//! Scoring rules for vocabulary practice.
//!
//! Every function here is pure: the server reconciler and the client's
//! optimistic cache both call them, so the same inputs always produce the
//! same XP, streak, and mastery on either side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::progress::SetProgressEntry;

// ---------------------------------------------------------------------------
// XP
// ---------------------------------------------------------------------------

/// XP awarded for an incorrect attempt.
pub const XP_INCORRECT: i64 = 2;

/// Base XP awarded for a correct attempt.
pub const XP_CORRECT_BASE: i64 = 10;

/// XP added per point of per-set streak on a correct attempt.
pub const XP_STREAK_BONUS_PER_STEP: i64 = 2;

/// Upper bound on the streak bonus.
pub const XP_STREAK_BONUS_CAP: i64 = 20;

/// XP needed to advance one level.
pub const XP_PER_LEVEL: i64 = 100;

/// XP earned by a single attempt.
///
/// `streak_after_attempt` is the per-set streak *after* the attempt has been
/// applied, so the first correct answer in a run already earns a bonus of 2.
pub fn xp_gain(was_correct: bool, streak_after_attempt: i32) -> i64 {
    if !was_correct {
        return XP_INCORRECT;
    }

    let bonus = if streak_after_attempt > 0 {
        (i64::from(streak_after_attempt) * XP_STREAK_BONUS_PER_STEP).min(XP_STREAK_BONUS_CAP)
    } else {
        0
    };

    XP_CORRECT_BASE + bonus
}

// ---------------------------------------------------------------------------
// Daily streak
// ---------------------------------------------------------------------------

/// Daily streak after practising on `today`.
///
/// Compared on calendar days only. A `last_practice_day` in the future
/// (clock skew) counts as a gap.
pub fn advance_daily_streak(
    prior_streak: i32,
    last_practice_day: Option<NaiveDate>,
    today: NaiveDate,
) -> i32 {
    let Some(last) = last_practice_day else {
        return 1;
    };

    if last == today {
        prior_streak
    } else if today.pred_opt() == Some(last) {
        prior_streak + 1
    } else {
        1
    }
}

// ---------------------------------------------------------------------------
// Mastery
// ---------------------------------------------------------------------------

/// Percentage (0-100) of correct attempts for a set, rounded half up.
pub fn mastery_for<K>(entry: Option<&SetProgressEntry<K>>) -> i32 {
    match entry {
        Some(e) if e.attempts > 0 => {
            let correct = i64::from(e.correct);
            let attempts = i64::from(e.attempts);
            ((200 * correct + attempts) / (2 * attempts)) as i32
        }
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Level reached with `total_xp` cumulative XP. Starts at 1.
pub fn level_for_xp(total_xp: i64) -> i32 {
    (total_xp.max(0) / XP_PER_LEVEL + 1) as i32
}

/// Named band of levels shown next to the XP counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Novice,
    Apprentice,
    Adept,
    Expert,
    Master,
}

impl Tier {
    pub fn for_level(level: i32) -> Self {
        match level {
            i32::MIN..=4 => Tier::Novice,
            5..=9 => Tier::Apprentice,
            10..=19 => Tier::Adept,
            20..=49 => Tier::Expert,
            _ => Tier::Master,
        }
    }

    pub fn for_xp(total_xp: i64) -> Self {
        Self::for_level(level_for_xp(total_xp))
    }
}
