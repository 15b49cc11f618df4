//! Refresh sessions.

use nuance_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `refresh_sessions`. The token hash is never read back.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
