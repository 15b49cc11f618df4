//! Client-side progress tracking with optimistic updates.
//!
//! A practice attempt is scored locally with the same functions the server
//! uses, written to a durable cache, and then sent to the API. The server's
//! answer always wins.

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod session;
pub mod sync;

pub use cache::ProgressCache;
pub use config::ClientConfig;
pub use error::ClientError;
pub use key::SetKey;
pub use session::{PracticeReport, PracticeSession, SyncStatus};
pub use sync::{HttpProgressApi, PracticeAck, ProgressApi};
