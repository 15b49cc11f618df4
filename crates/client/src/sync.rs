//! The seam between the local cache and the progress API.

use std::time::Duration;

use async_trait::async_trait;
use nuance_core::progress::ProgressState;
use nuance_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Server answer to a practice event.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeAck {
    pub progress: ProgressState<DbId>,
    pub xp_gain: i64,
}

/// Operations the client needs from the server.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// Fetch the caller's progress; `None` if they have never practised.
    async fn fetch_progress(&self) -> Result<Option<ProgressState<DbId>>, ClientError>;

    /// Record one attempt on a persisted set.
    async fn record_practice(
        &self,
        set_id: DbId,
        was_correct: bool,
    ) -> Result<PracticeAck, ClientError>;

    /// Delete all of the caller's progress.
    async fn reset(&self) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`ProgressApi`] over HTTP with a bearer token.
pub struct HttpProgressApi {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl HttpProgressApi {
    pub fn new(config: &ClientConfig, token: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone(), token))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, token: impl Into<String>) -> Self {
        Self {
            client,
            api_url,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/gamification{}", self.api_url, path)
    }

    /// Turn a non-2xx response into [`ClientError::Api`], preferring the
    /// `error` field of the JSON body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let envelope = response.json::<DataEnvelope<T>>().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ProgressApi for HttpProgressApi {
    async fn fetch_progress(&self) -> Result<Option<ProgressState<DbId>>, ClientError> {
        let response = self
            .client
            .get(self.url(""))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn record_practice(
        &self,
        set_id: DbId,
        was_correct: bool,
    ) -> Result<PracticeAck, ClientError> {
        let body = serde_json::json!({
            "set_id": set_id,
            "was_correct": was_correct,
        });

        let response = self
            .client
            .post(self.url("/practice"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn reset(&self) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/reset"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
