/// Errors from the progress client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reading or writing the cache file failed.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache file could not be encoded or decoded.
    #[error("Cache encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
