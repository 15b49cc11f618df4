//! Handlers for the vocabulary set catalog.
//!
//! Sets are owned by the caller; someone else's set is reported as not found.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nuance_core::error::CoreError;
use nuance_core::scoring::mastery_for;
use nuance_core::types::DbId;
use nuance_core::vocabulary::{validate_set_name, validate_words};
use nuance_db::models::vocabulary_set::{CreateVocabularySet, UpdateVocabularySet, VocabularySet};
use nuance_db::repositories::{GamificationRepo, VocabularySetRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /vocabulary/sets`.
#[derive(Debug, Deserialize)]
pub struct ListSetsParams {
    pub search: Option<String>,
}

/// A set together with the caller's mastery of it.
#[derive(Debug, Serialize)]
pub struct VocabularySetDetail {
    #[serde(flatten)]
    pub set: VocabularySet,
    pub mastery: i32,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "VocabularySet",
        id,
    })
}

/// GET /api/v1/vocabulary/sets?search=
pub async fn list_sets(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListSetsParams>,
) -> AppResult<Json<DataResponse<Vec<VocabularySet>>>> {
    let sets =
        VocabularySetRepo::list_for_owner(&state.pool, user.user_id, params.search.as_deref())
            .await?;
    Ok(Json(DataResponse { data: sets }))
}

/// POST /api/v1/vocabulary/sets
pub async fn create_set(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    payload: Result<Json<CreateVocabularySet>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<VocabularySet>>)> {
    let Json(input) = payload?;
    validate_set_name(&input.name)?;
    validate_words(&input.words)?;

    let set = VocabularySetRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        set_id = set.id,
        words = set.words.len(),
        "Vocabulary set created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: set })))
}

/// GET /api/v1/vocabulary/sets/{id}
pub async fn get_set(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VocabularySetDetail>>> {
    let set = VocabularySetRepo::find_for_owner(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let progress = GamificationRepo::find_by_user(&state.pool, user.user_id).await?;
    let mastery = mastery_for(progress.as_ref().and_then(|p| p.entry(id)));

    Ok(Json(DataResponse {
        data: VocabularySetDetail { set, mastery },
    }))
}

/// PUT /api/v1/vocabulary/sets/{id}
pub async fn update_set(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateVocabularySet>, JsonRejection>,
) -> AppResult<Json<DataResponse<VocabularySet>>> {
    let Json(input) = payload?;
    if let Some(name) = &input.name {
        validate_set_name(name)?;
    }
    if let Some(words) = &input.words {
        validate_words(words)?;
    }

    let set = VocabularySetRepo::update(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = user.user_id, set_id = id, "Vocabulary set updated");

    Ok(Json(DataResponse { data: set }))
}

/// DELETE /api/v1/vocabulary/sets/{id}
///
/// Practice progress recorded against the set is kept.
pub async fn delete_set(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !VocabularySetRepo::delete(&state.pool, id, user.user_id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = user.user_id, set_id = id, "Vocabulary set deleted");

    Ok(StatusCode::NO_CONTENT)
}
