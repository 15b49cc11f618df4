//! Vocabulary set entity model and DTOs.

use nuance_core::types::{DbId, Timestamp};
use nuance_core::vocabulary::VocabularyWord;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `vocabulary_sets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VocabularySet {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub words: Json<Vec<VocabularyWord>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a vocabulary set.
#[derive(Debug, Deserialize)]
pub struct CreateVocabularySet {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub words: Vec<VocabularyWord>,
}

/// DTO for updating a vocabulary set. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateVocabularySet {
    pub name: Option<String>,
    pub description: Option<String>,
    pub words: Option<Vec<VocabularyWord>>,
}
