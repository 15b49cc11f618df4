//! Repository for the `gamification_progress` table.
//!
//! Holds the persistence side of practice reconciliation: one record per
//! user, loaded, transformed by [`apply_practice`], and written back whole.
//! There is no row lock or version check, so two concurrent practice events
//! for the same user may race and the later write wins.

use nuance_core::progress::{apply_practice, PracticeInstant};
use nuance_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::gamification::{PracticeResult, ProgressRecord};

const COLUMNS: &str = "id, user_id, total_xp, daily_streak, last_practice_day, set_progress, \
                       created_at, updated_at";

/// Provides read, practice, and reset operations on progress records.
pub struct GamificationRepo;

impl GamificationRepo {
    /// Load a user's progress record, or `None` if they have never practised.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<ProgressRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gamification_progress WHERE user_id = $1");
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply one practice attempt and persist the resulting record.
    ///
    /// Read and write happen in one transaction so the counters and the
    /// touched set entry are committed together or not at all. The record
    /// is created on first practice. `set_id` is not checked against the
    /// vocabulary catalog.
    pub async fn record_practice(
        pool: &PgPool,
        user_id: DbId,
        set_id: DbId,
        was_correct: bool,
        at: PracticeInstant,
    ) -> Result<PracticeResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM gamification_progress WHERE user_id = $1");
        let current = sqlx::query_as::<_, ProgressRecord>(&select)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = apply_practice(
            current.as_ref().map(ProgressRecord::state),
            set_id,
            was_correct,
            at,
        );

        let upsert = format!(
            "INSERT INTO gamification_progress
                (user_id, total_xp, daily_streak, last_practice_day, set_progress)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO UPDATE SET
                total_xp = EXCLUDED.total_xp,
                daily_streak = EXCLUDED.daily_streak,
                last_practice_day = EXCLUDED.last_practice_day,
                set_progress = EXCLUDED.set_progress
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, ProgressRecord>(&upsert)
            .bind(user_id)
            .bind(outcome.state.total_xp)
            .bind(outcome.state.daily_streak)
            .bind(outcome.state.last_practice_day)
            .bind(Json(&outcome.state.set_progress))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id,
            set_id,
            was_correct,
            xp_gain = outcome.xp_gain,
            total_xp = record.total_xp,
            daily_streak = record.daily_streak,
            "Practice recorded",
        );

        Ok(PracticeResult {
            record,
            xp_gain: outcome.xp_gain,
        })
    }

    /// Delete a user's progress record.
    ///
    /// Returns `true` if a record existed. Deleting a missing record is not
    /// an error.
    pub async fn delete_for_user(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gamification_progress WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
