//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, plus `Deserialize` DTOs where the entity is written through the API.

pub mod gamification;
pub mod session;
pub mod user;
pub mod vocabulary_set;
