//! Crate-wide error type.
//!
//! Adapters and the gainer lister use [`NewsError`] internally and collapse it
//! into an empty result at their public boundary. The sentiment scorer and the
//! configuration loader surface it to their callers.

use thiserror::Error;

/// Everything that can go wrong between the network and the report.
#[derive(Debug, Error)]
pub enum NewsError {
    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response arrived with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("markup parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty or whitespace-only text was handed to the scorer.
    #[error("refusing to score empty text")]
    EmptyText,

    #[error("classifier error: {0}")]
    Classifier(String),

    /// Unreadable, unparsable or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for NewsError {
    fn from(e: serde_yaml::Error) -> Self {
        NewsError::Config(e.to_string())
    }
}

impl From<std::io::Error> for NewsError {
    fn from(e: std::io::Error) -> Self {
        NewsError::Config(e.to_string())
    }
}
