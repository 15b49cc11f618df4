//! Repository for the `vocabulary_sets` table.
//!
//! Every query is scoped by `owner_id`; a set owned by someone else is
//! indistinguishable from a missing one.

use nuance_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::vocabulary_set::{CreateVocabularySet, UpdateVocabularySet, VocabularySet};

const COLUMNS: &str = "id, owner_id, name, description, words, created_at, updated_at";

/// Provides CRUD operations for a user's vocabulary sets.
pub struct VocabularySetRepo;

impl VocabularySetRepo {
    /// Insert a new set for `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateVocabularySet,
    ) -> Result<VocabularySet, sqlx::Error> {
        let query = format!(
            "INSERT INTO vocabulary_sets (owner_id, name, description, words)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VocabularySet>(&query)
            .bind(owner_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(Json(&input.words))
            .fetch_one(pool)
            .await
    }

    /// Find one of the owner's sets by ID.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<VocabularySet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vocabulary_sets WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, VocabularySet>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's sets, newest first.
    ///
    /// When `search` is given, only sets whose name contains it
    /// (case-insensitive) are returned.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        search: Option<&str>,
    ) -> Result<Vec<VocabularySet>, sqlx::Error> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "SELECT {COLUMNS} FROM vocabulary_sets
             WHERE owner_id = $1
               AND ($2::TEXT IS NULL OR name ILIKE $2 ESCAPE '\\')
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, VocabularySet>(&query)
            .bind(owner_id)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Update one of the owner's sets. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the set does not exist or belongs to another user.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateVocabularySet,
    ) -> Result<Option<VocabularySet>, sqlx::Error> {
        let query = format!(
            "UPDATE vocabulary_sets SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                words = COALESCE($5, words)
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VocabularySet>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.words.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete one of the owner's sets. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vocabulary_sets WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
