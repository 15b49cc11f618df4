//! Handlers for vocabulary practice gamification.
//!
//! All endpoints act on the caller's own progress record.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use nuance_core::progress::{validate_practice, PracticeInstant, SetProgressEntry};
use nuance_core::scoring::{level_for_xp, mastery_for, Tier};
use nuance_core::types::{DbId, Timestamp};
use nuance_db::models::gamification::ProgressRecord;
use nuance_db::repositories::GamificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /gamification/practice`.
///
/// Both fields are optional at the serde level so a missing field becomes a
/// validation error instead of a generic JSON rejection.
#[derive(Debug, Deserialize)]
pub struct RecordPracticeRequest {
    #[serde(default, alias = "setId")]
    pub set_id: Option<DbId>,
    #[serde(default, alias = "wasCorrect")]
    pub was_correct: Option<bool>,
}

/// Per-set statistics with the derived mastery percentage.
#[derive(Debug, Serialize)]
pub struct SetProgressView {
    #[serde(flatten)]
    pub entry: SetProgressEntry,
    pub mastery: i32,
}

/// A progress record as returned to clients.
#[derive(Debug, Serialize)]
pub struct GamificationView {
    pub user_id: DbId,
    pub total_xp: i64,
    pub level: i32,
    pub tier: Tier,
    pub daily_streak: i32,
    pub last_practice_day: Option<NaiveDate>,
    pub set_progress: Vec<SetProgressView>,
    pub updated_at: Timestamp,
}

impl From<ProgressRecord> for GamificationView {
    fn from(record: ProgressRecord) -> Self {
        let set_progress = record
            .set_progress
            .0
            .into_iter()
            .map(|entry| SetProgressView {
                mastery: mastery_for(Some(&entry)),
                entry,
            })
            .collect();

        Self {
            user_id: record.user_id,
            total_xp: record.total_xp,
            level: level_for_xp(record.total_xp),
            tier: Tier::for_xp(record.total_xp),
            daily_streak: record.daily_streak,
            last_practice_day: record.last_practice_day,
            set_progress,
            updated_at: record.updated_at,
        }
    }
}

/// Response of `POST /gamification/practice`.
#[derive(Debug, Serialize)]
pub struct PracticeResponse {
    pub progress: GamificationView,
    /// XP earned by this attempt alone.
    pub xp_gain: i64,
}

/// Response of `POST /gamification/reset`.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub reset: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/gamification
///
/// Returns `{ "data": null }` when the caller has never practised.
pub async fn get_gamification(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<GamificationView>>>> {
    let record = GamificationRepo::find_by_user(&state.pool, user.user_id).await?;

    Ok(Json(DataResponse {
        data: record.map(GamificationView::from),
    }))
}

/// POST /api/v1/gamification/practice
///
/// Record one self-graded attempt on a flashcard set. Invalid input is
/// rejected before the database is touched.
pub async fn record_practice(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    payload: Result<Json<RecordPracticeRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<PracticeResponse>>> {
    let Json(input) = payload?;
    let (set_id, was_correct) = validate_practice(input.set_id, input.was_correct)?;

    let result = GamificationRepo::record_practice(
        &state.pool,
        user.user_id,
        set_id,
        was_correct,
        PracticeInstant::now(),
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        set_id,
        was_correct,
        xp_gain = result.xp_gain,
        total_xp = result.record.total_xp,
        "Practice recorded",
    );

    Ok(Json(DataResponse {
        data: PracticeResponse {
            progress: result.record.into(),
            xp_gain: result.xp_gain,
        },
    }))
}

/// POST /api/v1/gamification/reset
///
/// Delete the caller's progress. Succeeds whether or not a record existed.
pub async fn reset_gamification(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ResetResponse>>> {
    let existed = GamificationRepo::delete_for_user(&state.pool, user.user_id).await?;

    tracing::info!(user_id = user.user_id, existed, "Gamification progress reset");

    Ok(Json(DataResponse {
        data: ResetResponse { reset: true },
    }))
}
