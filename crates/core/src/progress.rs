//! Per-user practice progress and the state transition for one practice event.
//!
//! [`apply_practice`] is the single source of truth for how a practice
//! attempt changes a user's progress. The server runs it inside the
//! reconciler's read-modify-write, and the client runs it to render an
//! optimistic result before the server answers.
//!
//! The set key is generic so the client can track sets that only exist
//! locally; on the server it is always a [`DbId`].

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scoring::{advance_daily_streak, xp_gain};
use crate::types::{DbId, Timestamp};

/// Practice statistics for one flashcard set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProgressEntry<K = DbId> {
    pub set_id: K,
    pub attempts: i32,
    pub correct: i32,
    /// Consecutive correct attempts; reset to 0 by any miss.
    pub streak: i32,
    pub last_attempt: Timestamp,
}

impl<K> SetProgressEntry<K> {
    fn new(set_id: K, now: Timestamp) -> Self {
        Self {
            set_id,
            attempts: 0,
            correct: 0,
            streak: 0,
            last_attempt: now,
        }
    }

    /// Record one attempt against this set.
    fn record_attempt(&mut self, was_correct: bool, now: Timestamp) {
        self.attempts += 1;
        if was_correct {
            self.correct += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.last_attempt = now;
    }
}

/// Gamification state of one user, independent of how it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState<K = DbId> {
    pub total_xp: i64,
    pub daily_streak: i32,
    pub last_practice_day: Option<NaiveDate>,
    /// One entry per practised set, in first-practice order.
    pub set_progress: Vec<SetProgressEntry<K>>,
}

impl<K> Default for ProgressState<K> {
    fn default() -> Self {
        Self {
            total_xp: 0,
            daily_streak: 0,
            last_practice_day: None,
            set_progress: Vec::new(),
        }
    }
}

impl<K: PartialEq> ProgressState<K> {
    pub fn entry(&self, set_id: &K) -> Option<&SetProgressEntry<K>> {
        self.set_progress.iter().find(|e| &e.set_id == set_id)
    }

    fn entry_mut_or_insert(&mut self, set_id: K, now: Timestamp) -> &mut SetProgressEntry<K> {
        let idx = match self.set_progress.iter().position(|e| e.set_id == set_id) {
            Some(idx) => idx,
            None => {
                self.set_progress.push(SetProgressEntry::new(set_id, now));
                self.set_progress.len() - 1
            }
        };
        &mut self.set_progress[idx]
    }
}

/// The moment a practice event happens.
///
/// `today` is the server-local calendar date and drives the daily streak;
/// `now` is stamped on the set entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeInstant {
    pub now: Timestamp,
    pub today: NaiveDate,
}

impl PracticeInstant {
    pub fn now() -> Self {
        Self {
            now: Utc::now(),
            today: Local::now().date_naive(),
        }
    }
}

/// Result of applying one practice event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeOutcome<K = DbId> {
    pub state: ProgressState<K>,
    pub xp_gain: i64,
}

/// Apply one practice attempt to a user's progress.
///
/// `state` is `None` when the user has never practised; a fresh state is
/// created in that case.
pub fn apply_practice<K: PartialEq>(
    state: Option<ProgressState<K>>,
    set_id: K,
    was_correct: bool,
    at: PracticeInstant,
) -> PracticeOutcome<K> {
    let mut state = state.unwrap_or_default();

    state.daily_streak = advance_daily_streak(state.daily_streak, state.last_practice_day, at.today);
    state.last_practice_day = Some(at.today);

    let entry = state.entry_mut_or_insert(set_id, at.now);
    entry.record_attempt(was_correct, at.now);
    let gain = xp_gain(was_correct, entry.streak);

    state.total_xp += gain;

    PracticeOutcome {
        state,
        xp_gain: gain,
    }
}

/// Check the fields of a practice request before anything is persisted.
pub fn validate_practice(
    set_id: Option<DbId>,
    was_correct: Option<bool>,
) -> Result<(DbId, bool), CoreError> {
    let set_id = set_id.ok_or_else(|| CoreError::Validation("set_id is required".to_string()))?;
    if set_id <= 0 {
        return Err(CoreError::Validation(format!(
            "set_id must be a positive id, got {set_id}"
        )));
    }
    let was_correct = was_correct
        .ok_or_else(|| CoreError::Validation("was_correct must be a boolean".to_string()))?;
    Ok((set_id, was_correct))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    use super::*;

    fn instant(day: &str, hour: u32) -> PracticeInstant {
        let today = NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap();
        let now = Utc
            .from_utc_datetime(&today.and_hms_opt(hour, 0, 0).unwrap());
        PracticeInstant { now, today }
    }

    fn practice(
        state: Option<ProgressState>,
        set_id: DbId,
        was_correct: bool,
        at: PracticeInstant,
    ) -> (ProgressState, i64) {
        let outcome = apply_practice(state, set_id, was_correct, at);
        (outcome.state, outcome.xp_gain)
    }

    fn assert_entry_invariants(state: &ProgressState) {
        for e in &state.set_progress {
            assert!(e.correct <= e.attempts, "correct > attempts in {e:?}");
            assert!(e.streak <= e.attempts, "streak > attempts in {e:?}");
            assert!(e.correct >= 0 && e.streak >= 0);
        }
    }

    #[test]
    fn first_practice_creates_state() {
        let (state, gain) = practice(None, 7, false, instant("2024-01-01", 9));

        assert_eq!(gain, 2);
        assert_eq!(state.total_xp, 2);
        assert_eq!(state.daily_streak, 1);
        assert_eq!(state.last_practice_day, Some(instant("2024-01-01", 9).today));
        assert_eq!(state.set_progress.len(), 1);
        let e = &state.set_progress[0];
        assert_eq!((e.set_id, e.attempts, e.correct, e.streak), (7, 1, 0, 0));
    }

    #[test]
    fn three_correct_days_in_a_row() {
        let (s, g1) = practice(None, 1, true, instant("2024-01-10", 8));
        let (s, g2) = practice(Some(s), 1, true, instant("2024-01-11", 8));
        let (s, g3) = practice(Some(s), 1, true, instant("2024-01-12", 8));

        assert_eq!((g1, g2, g3), (12, 14, 16));
        assert_eq!(s.total_xp, 42);
        assert_eq!(s.daily_streak, 3);
        let e = s.entry(&1).unwrap();
        assert_eq!((e.attempts, e.correct, e.streak), (3, 3, 3));
    }

    #[test]
    fn miss_after_streak_resets_set_streak() {
        let mut state = None;
        for _ in 0..3 {
            state = Some(practice(state, 1, true, instant("2024-01-10", 8)).0);
        }
        let before = state.clone().unwrap();
        let (after, gain) = practice(state, 1, false, instant("2024-01-10", 9));

        assert_eq!(gain, 2);
        assert_eq!(after.total_xp, before.total_xp + 2);
        let e = after.entry(&1).unwrap();
        assert_eq!(e.streak, 0);
        assert_eq!(e.attempts, 4);
        assert_eq!(e.correct, 3);
    }

    #[test]
    fn same_day_practice_does_not_inflate_daily_streak() {
        let (s, _) = practice(None, 1, true, instant("2024-01-10", 0));
        let (s, _) = practice(Some(s), 2, true, instant("2024-01-10", 23));
        assert_eq!(s.daily_streak, 1);
    }

    #[test]
    fn gap_resets_daily_streak_to_one() {
        let (s, _) = practice(None, 1, true, instant("2024-01-10", 8));
        let (s, _) = practice(Some(s), 1, true, instant("2024-01-11", 8));
        let (s, _) = practice(Some(s), 1, true, instant("2024-01-14", 8));
        assert_eq!(s.daily_streak, 1);
        assert_eq!(s.last_practice_day, Some(instant("2024-01-14", 8).today));
    }

    #[test]
    fn entries_keep_first_practice_order() {
        let at = instant("2024-01-10", 8);
        let (s, _) = practice(None, 30, true, at);
        let (s, _) = practice(Some(s), 10, true, at);
        let (s, _) = practice(Some(s), 30, false, at);
        let (s, _) = practice(Some(s), 20, true, at);

        let ids: Vec<_> = s.set_progress.iter().map(|e| e.set_id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn per_set_streaks_are_independent() {
        let at = instant("2024-01-10", 8);
        let (s, _) = practice(None, 1, true, at);
        let (s, _) = practice(Some(s), 1, true, at);
        let (s, _) = practice(Some(s), 2, false, at);
        let (s, gain) = practice(Some(s), 1, true, at);

        assert_eq!(gain, 16);
        assert_eq!(s.entry(&1).unwrap().streak, 3);
        assert_eq!(s.entry(&2).unwrap().streak, 0);
    }

    #[test]
    fn last_attempt_tracks_latest_event() {
        let first = instant("2024-01-10", 8);
        let mut second = first;
        second.now = first.now + Duration::minutes(5);

        let (s, _) = practice(None, 1, true, first);
        let (s, _) = practice(Some(s), 1, true, second);
        assert_eq!(s.entry(&1).unwrap().last_attempt, second.now);
    }

    #[test]
    fn invariants_hold_over_mixed_sequence() {
        let days = ["2024-03-01", "2024-03-02", "2024-03-05", "2024-03-05"];
        let mut state: Option<ProgressState> = None;
        let mut total = 0;
        for (i, day) in days.iter().cycle().take(40).enumerate() {
            let was_correct = i % 3 != 0;
            let set_id = (i % 4) as DbId + 1;
            let (s, gain) = practice(state, set_id, was_correct, instant(day, 12));
            assert_entry_invariants(&s);
            assert!(gain >= 2);
            total += gain;
            assert_eq!(s.total_xp, total, "total XP must equal the sum of gains");
            state = Some(s);
        }
    }

    #[test]
    fn fresh_state_after_reset_starts_from_scratch() {
        let (s, _) = practice(None, 1, true, instant("2024-01-10", 8));
        let (s, _) = practice(Some(s), 1, true, instant("2024-01-11", 8));
        drop(s);

        let (s, gain) = practice(None, 1, true, instant("2024-01-12", 8));
        assert_eq!(gain, 12);
        assert_eq!(s.total_xp, 12);
        assert_eq!(s.daily_streak, 1);
    }

    #[test]
    fn works_with_non_integer_keys() {
        let at = instant("2024-01-10", 8);
        let outcome = apply_practice(None, "local-set".to_string(), true, at);
        assert_eq!(outcome.xp_gain, 12);
        assert!(outcome.state.entry(&"local-set".to_string()).is_some());
    }

    #[test]
    fn validate_practice_accepts_complete_request() {
        assert_matches!(validate_practice(Some(5), Some(false)), Ok((5, false)));
    }

    #[test]
    fn validate_practice_rejects_missing_fields() {
        assert_matches!(validate_practice(None, Some(true)), Err(CoreError::Validation(_)));
        assert_matches!(validate_practice(Some(5), None), Err(CoreError::Validation(_)));
        assert_matches!(validate_practice(Some(0), Some(true)), Err(CoreError::Validation(_)));
        assert_matches!(validate_practice(Some(-3), Some(true)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn state_serializes_day_as_calendar_date() {
        let (s, _) = practice(None, 1, true, instant("2024-01-10", 8));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["last_practice_day"], "2024-01-10");
        assert_eq!(json["set_progress"][0]["set_id"], 1);
    }
}
