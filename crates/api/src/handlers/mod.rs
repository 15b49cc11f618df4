pub mod admin;
pub mod auth;
pub mod gamification;
pub mod vocabulary;
