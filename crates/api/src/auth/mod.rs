//! Credentials and tokens.

pub mod jwt;
pub mod password;
pub mod refresh;
