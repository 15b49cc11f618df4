//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod gamification_repo;
pub mod session_repo;
pub mod user_repo;
pub mod vocabulary_set_repo;

pub use gamification_repo::GamificationRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use vocabulary_set_repo::VocabularySetRepo;
