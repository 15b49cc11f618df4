//! Vocabulary set content and its validation rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Maximum length of a vocabulary set name.
pub const MAX_SET_NAME_LEN: usize = 100;

/// Maximum number of words in one set.
pub const MAX_WORDS_PER_SET: usize = 500;

/// One flashcard: a term and the nuance that distinguishes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VocabularyWord {
    #[validate(length(min = 1, max = 200, message = "term must be 1-200 characters"))]
    pub term: String,
    #[validate(length(min = 1, max = 2000, message = "nuance must be 1-2000 characters"))]
    pub nuance: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "example must be at most 2000 characters"))]
    pub example: Option<String>,
}

/// Validate a set name: non-blank and at most [`MAX_SET_NAME_LEN`] characters.
pub fn validate_set_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Set name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_SET_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Set name must be at most {MAX_SET_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate the word list of a set.
pub fn validate_words(words: &[VocabularyWord]) -> Result<(), CoreError> {
    if words.len() > MAX_WORDS_PER_SET {
        return Err(CoreError::Validation(format!(
            "A set may contain at most {MAX_WORDS_PER_SET} words"
        )));
    }
    for (idx, word) in words.iter().enumerate() {
        word.validate()
            .map_err(|e| CoreError::Validation(format!("words[{idx}]: {e}")))?;
        if word.term.trim().is_empty() || word.nuance.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "words[{idx}]: term and nuance must not be blank"
            )));
        }
    }
    Ok(())
}
