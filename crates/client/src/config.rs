use std::path::PathBuf;

/// Error raised when a client environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
#[error("{name} has invalid value '{value}'")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the versioned API, without a trailing slash.
    pub api_url: String,
    /// Location of the progress cache file.
    pub cache_path: PathBuf,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                        |
    /// |------------------------------|--------------------------------|
    /// | `NUANCE_API_URL`             | `http://localhost:3000/api/v1` |
    /// | `NUANCE_CACHE_PATH`          | `nuance-progress.json`         |
    /// | `NUANCE_REQUEST_TIMEOUT_SECS`| `10`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(
            &std::env::var("NUANCE_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/v1".to_string()),
        );

        let cache_path = std::env::var("NUANCE_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("nuance-progress.json"));

        let request_timeout_secs = match std::env::var("NUANCE_REQUEST_TIMEOUT_SECS") {
            Ok(value) => value.parse().map_err(|_| ConfigError {
                name: "NUANCE_REQUEST_TIMEOUT_SECS",
                value,
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            api_url,
            cache_path,
            request_timeout_secs,
        })
    }
}

fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
