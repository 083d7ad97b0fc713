//! Error types for the upstream completion API.

use thiserror::Error;

/// Errors surfaced by the upstream completion client.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The configured API key environment variable is not set.
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),

    /// Transport-level failure: connect, TLS, request build.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A chunk payload could not be deserialized.
    #[error("Failed to parse completion chunk: {0}")]
    Parse(#[from] serde_json::Error),

    /// The event stream broke mid-completion.
    #[error("Event stream failed: {0}")]
    Stream(String),
}
