//! Error types for the seolens crate

use thiserror::Error;

/// Result type for seolens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for seolens operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser automation error
    #[error("Browser error: {0}")]
    Browser(String),

    /// Page audit error
    #[error("Audit error: {0}")]
    Audit(String),

    /// Recommendation composition error
    #[error("Compose error: {0}")]
    Compose(String),

    /// Retrieval-augmented-generation error
    #[error("RAG error: {0}")]
    Rag(String),

    /// Backlink API error
    #[error("Backlinks error: {0}")]
    Backlinks(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
