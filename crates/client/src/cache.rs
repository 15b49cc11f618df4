//! Durable local copy of the caller's progress.
//!
//! The cache is loaded before any server call so the UI can render
//! immediately, and every mutation is followed by an atomic save.

use std::path::{Path, PathBuf};

use chrono::Utc;
use nuance_core::progress::{apply_practice, PracticeInstant, ProgressState, SetProgressEntry};
use nuance_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::key::SetKey;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    /// User the progress belongs to. Files without one are never reused.
    #[serde(default)]
    owner: Option<DbId>,
    state: ProgressState<SetKey>,
    /// Set while a persisted-set attempt has been applied locally but not
    /// yet acknowledged by the server.
    #[serde(default)]
    unsynced: bool,
    /// Message of the last failed sync; cleared by the next success.
    sync_error: Option<String>,
    last_synced_at: Option<Timestamp>,
}

/// The local progress cache backed by a JSON file.
#[derive(Debug)]
pub struct ProgressCache {
    path: PathBuf,
    file: CacheFile,
}

impl ProgressCache {
    /// Load `user_id`'s cache from `path`.
    ///
    /// A missing file, or one written for a different user, yields an empty
    /// cache owned by `user_id`. The other user's file is replaced on the
    /// next save.
    pub fn load(path: impl Into<PathBuf>, user_id: DbId) -> Result<Self, ClientError> {
        let path = path.into();
        let stored: Option<CacheFile> = match std::fs::read(&path) {
            Ok(bytes) => Some(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let file = match stored {
            Some(file) if file.owner == Some(user_id) => file,
            Some(file) => {
                tracing::info!(
                    path = %path.display(),
                    user_id,
                    cached_owner = ?file.owner,
                    "Ignoring progress cache written for another user",
                );
                CacheFile::owned_by(user_id)
            }
            None => CacheFile::owned_by(user_id),
        };

        tracing::debug!(
            path = %path.display(),
            user_id,
            sets = file.state.set_progress.len(),
            total_xp = file.state.total_xp,
            "Loaded progress cache",
        );

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The user this cache belongs to.
    pub fn user_id(&self) -> Option<DbId> {
        self.file.owner
    }

    pub fn state(&self) -> &ProgressState<SetKey> {
        &self.file.state
    }

    /// Whether the last sync attempt failed.
    pub fn has_sync_error(&self) -> bool {
        self.file.sync_error.is_some()
    }

    pub fn sync_error(&self) -> Option<&str> {
        self.file.sync_error.as_deref()
    }

    pub fn last_synced_at(&self) -> Option<Timestamp> {
        self.file.last_synced_at
    }

    /// Score one attempt locally and return the optimistic XP gain.
    pub fn apply_local(&mut self, key: SetKey, was_correct: bool, at: PracticeInstant) -> i64 {
        let current = std::mem::take(&mut self.file.state);
        let outcome = apply_practice(Some(current), key, was_correct, at);
        self.file.state = outcome.state;
        if key.persisted_id().is_some() {
            self.file.unsynced = true;
        }
        outcome.xp_gain
    }

    /// Take the server's answer to a practice event.
    ///
    /// The user-level counters and the touched set's entry are replaced with
    /// the server's values. Every other local entry is left alone.
    pub fn reconcile_practice(&mut self, set_id: DbId, server: &ProgressState<DbId>) {
        self.overwrite_counters(server);
        if let Some(entry) = server.entry(&set_id) {
            self.upsert_entry(to_local(entry));
        }
        self.file.unsynced = false;
    }

    /// Merge a full snapshot fetched from the server.
    ///
    /// `None` means the server has no record. If attempts made offline are
    /// still waiting to be sent, local state is kept. Otherwise the server
    /// wins and persisted-set progress is cleared, as after a reset.
    pub fn replace_from_server(&mut self, server: Option<&ProgressState<DbId>>) {
        let Some(server) = server else {
            if !self.file.unsynced {
                self.clear_persisted();
            }
            return;
        };

        self.overwrite_counters(server);
        for entry in &server.set_progress {
            self.upsert_entry(to_local(entry));
        }
        self.file.unsynced = false;
    }

    /// Drop everything the server knows about, keeping local-only sets.
    pub fn clear_persisted(&mut self) {
        let local_only = std::mem::take(&mut self.file.state.set_progress)
            .into_iter()
            .filter(|e| matches!(e.set_id, SetKey::Local(_)))
            .collect();

        self.file.state = ProgressState {
            set_progress: local_only,
            ..ProgressState::default()
        };
        self.file.unsynced = false;
    }

    pub fn mark_synced(&mut self) {
        self.file.sync_error = None;
        self.file.last_synced_at = Some(Utc::now());
    }

    pub fn mark_sync_failed(&mut self, message: impl Into<String>) {
        self.file.sync_error = Some(message.into());
    }

    /// Write the cache to disk through a temp file and rename.
    pub fn save(&self) -> Result<(), ClientError> {
        let bytes = serde_json::to_vec_pretty(&self.file)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("progress");
        let tmp = self
            .path
            .with_file_name(format!(".{file_name}.tmp.{}", std::process::id()));

        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn overwrite_counters(&mut self, server: &ProgressState<DbId>) {
        let state = &mut self.file.state;
        state.total_xp = server.total_xp;
        state.daily_streak = server.daily_streak;
        state.last_practice_day = server.last_practice_day;
    }

    fn upsert_entry(&mut self, entry: SetProgressEntry<SetKey>) {
        let entries = &mut self.file.state.set_progress;
        match entries.iter_mut().find(|e| e.set_id == entry.set_id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }
}

impl CacheFile {
    fn owned_by(user_id: DbId) -> Self {
        Self {
            owner: Some(user_id),
            ..Self::default()
        }
    }
}

fn to_local(entry: &SetProgressEntry<DbId>) -> SetProgressEntry<SetKey> {
    SetProgressEntry {
        set_id: SetKey::Persisted(entry.set_id),
        attempts: entry.attempts,
        correct: entry.correct,
        streak: entry.streak,
        last_attempt: entry.last_attempt,
    }
}
