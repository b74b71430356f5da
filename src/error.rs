use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the remote task service. Every variant is
/// recoverable; the user retries with an explicit refresh.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API request failed with status {status}")]
    Status { status: u16 },

    #[error("failed to make request: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] std::io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<ureq::Error> for ServiceError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => ServiceError::Status { status },
            ureq::Error::Transport(t) => ServiceError::Transport(t.to_string()),
        }
    }
}

/// Failures reading or writing the local snapshot cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to access cache file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cache file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {collection} snapshot: {source}")]
    Serialize {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
