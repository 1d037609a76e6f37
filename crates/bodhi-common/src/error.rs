/// Error types shared across the Bodhi front-end crates.
///
/// These errors represent failures in infrastructure components (HTTP, local state files)
/// that are common to the docs builder and the app guard. Application-specific errors should
/// be defined in each binary crate and wrap `CommonError` via `#[from]`.
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("server returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("server returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
