//! Domain types and pure logic shared by the server and the client.

pub mod error;
pub mod progress;
pub mod roles;
pub mod scoring;
pub mod types;
pub mod vocabulary;
