//! Practice flow: optimistic local update followed by a server sync.

use nuance_core::progress::PracticeInstant;

use crate::cache::ProgressCache;
use crate::error::ClientError;
use crate::key::SetKey;
use crate::sync::ProgressApi;

/// How a change reached (or did not reach) the server.
#[derive(Debug)]
pub enum SyncStatus {
    /// The server accepted it and the cache now mirrors its answer.
    Synced,
    /// Nothing was sent: the set only exists on this device.
    LocalOnly,
    /// The call failed. Local state was kept and the error flag is set.
    Failed(ClientError),
}

/// Result of one practice attempt.
#[derive(Debug)]
pub struct PracticeReport {
    pub key: SetKey,
    /// XP shown to the user right away.
    pub optimistic_xp_gain: i64,
    /// XP the server awarded, when it answered.
    pub server_xp_gain: Option<i64>,
    pub sync: SyncStatus,
}

/// Owns the cache and the API handle for one signed-in user.
pub struct PracticeSession<A> {
    api: A,
    cache: ProgressCache,
}

impl<A: ProgressApi> PracticeSession<A> {
    pub fn new(api: A, cache: ProgressCache) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &ProgressCache {
        &self.cache
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Record one attempt now.
    pub async fn practice(
        &mut self,
        key: SetKey,
        was_correct: bool,
    ) -> Result<PracticeReport, ClientError> {
        self.practice_at(key, was_correct, PracticeInstant::now()).await
    }

    /// Record one attempt at a given instant.
    ///
    /// Only cache I/O errors are returned as `Err`; a failed sync is
    /// reported through [`PracticeReport::sync`]. There is no retry.
    pub async fn practice_at(
        &mut self,
        key: SetKey,
        was_correct: bool,
        at: PracticeInstant,
    ) -> Result<PracticeReport, ClientError> {
        let optimistic_xp_gain = self.cache.apply_local(key, was_correct, at);
        self.cache.save()?;

        let Some(set_id) = key.persisted_id() else {
            return Ok(PracticeReport {
                key,
                optimistic_xp_gain,
                server_xp_gain: None,
                sync: SyncStatus::LocalOnly,
            });
        };

        match self.api.record_practice(set_id, was_correct).await {
            Ok(ack) => {
                if ack.xp_gain != optimistic_xp_gain
                    || ack.progress.total_xp != self.cache.state().total_xp
                {
                    tracing::debug!(
                        set_id,
                        optimistic_xp_gain,
                        server_xp_gain = ack.xp_gain,
                        local_total = self.cache.state().total_xp,
                        server_total = ack.progress.total_xp,
                        "Correcting optimistic progress from server",
                    );
                }

                self.cache.reconcile_practice(set_id, &ack.progress);
                self.cache.mark_synced();
                self.cache.save()?;

                Ok(PracticeReport {
                    key,
                    optimistic_xp_gain,
                    server_xp_gain: Some(ack.xp_gain),
                    sync: SyncStatus::Synced,
                })
            }
            Err(e) => {
                tracing::warn!(set_id, error = %e, "Practice sync failed, keeping local progress");
                self.cache.mark_sync_failed(e.to_string());
                self.cache.save()?;

                Ok(PracticeReport {
                    key,
                    optimistic_xp_gain,
                    server_xp_gain: None,
                    sync: SyncStatus::Failed(e),
                })
            }
        }
    }

    /// Pull the server snapshot after the cache has been shown.
    pub async fn sync_on_startup(&mut self) -> Result<SyncStatus, ClientError> {
        let status = match self.api.fetch_progress().await {
            Ok(server) => {
                tracing::debug!(has_record = server.is_some(), "Fetched server progress");
                self.cache.replace_from_server(server.as_ref());
                self.cache.mark_synced();
                SyncStatus::Synced
            }
            Err(e) => {
                tracing::warn!(error = %e, "Startup sync failed, using cached progress");
                self.cache.mark_sync_failed(e.to_string());
                SyncStatus::Failed(e)
            }
        };

        self.cache.save()?;
        Ok(status)
    }

    /// Delete progress on the server, then locally.
    ///
    /// Local state is untouched if the server call fails.
    pub async fn reset(&mut self) -> Result<(), ClientError> {
        self.api.reset().await?;

        self.cache.clear_persisted();
        self.cache.mark_synced();
        self.cache.save()?;

        tracing::info!("Progress reset");
        Ok(())
    }
}
