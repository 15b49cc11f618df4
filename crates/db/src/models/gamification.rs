//! Gamification progress record (one row per user).

use chrono::NaiveDate;
use nuance_core::progress::{ProgressState, SetProgressEntry};
use nuance_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `gamification_progress` table.
///
/// The per-set entries are stored inline as JSONB so the whole record is
/// read and written as one document.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgressRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub total_xp: i64,
    pub daily_streak: i32,
    pub last_practice_day: Option<NaiveDate>,
    pub set_progress: Json<Vec<SetProgressEntry>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProgressRecord {
    /// The storage-independent progress state held by this record.
    pub fn state(&self) -> ProgressState {
        ProgressState {
            total_xp: self.total_xp,
            daily_streak: self.daily_streak,
            last_practice_day: self.last_practice_day,
            set_progress: self.set_progress.0.clone(),
        }
    }

    pub fn entry(&self, set_id: DbId) -> Option<&SetProgressEntry> {
        self.set_progress.iter().find(|e| e.set_id == set_id)
    }
}

/// The persisted record after a practice event plus the XP that event earned.
#[derive(Debug, Clone)]
pub struct PracticeResult {
    pub record: ProgressRecord,
    pub xp_gain: i64,
}
