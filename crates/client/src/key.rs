use nuance_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a flashcard set on the client.
///
/// Sets that have not been saved yet only exist locally and are keyed by a
/// client-generated UUID. Their practice never leaves the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SetKey {
    Persisted(DbId),
    Local(Uuid),
}

impl SetKey {
    /// A fresh key for an unsaved set.
    pub fn new_local() -> Self {
        SetKey::Local(Uuid::new_v4())
    }

    /// The server id, if this key refers to a set the server can accept.
    pub fn persisted_id(&self) -> Option<DbId> {
        match *self {
            SetKey::Persisted(id) if id > 0 => Some(id),
            _ => None,
        }
    }
}

impl From<DbId> for SetKey {
    fn from(id: DbId) -> Self {
        SetKey::Persisted(id)
    }
}
