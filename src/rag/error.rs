//! Error types for the retrieval module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for indexing and retrieval operations
#[derive(Debug, Error)]
pub enum RagError {
    /// Retrieval was requested before indexing completed
    #[error("Index not initialized; run the document indexer first")]
    NotReady,

    /// A rebuild is already running
    #[error("Index rebuild already in progress")]
    RebuildInProgress,

    /// A source document could not be read
    #[error("Source read error: {0}")]
    Source(#[from] std::io::Error),

    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The answer completion failed
    #[error("Completion error: {0}")]
    Completion(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// SQL query error
    #[error("Query error: {0}")]
    Query(String),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Row data error
    #[error("Data error: {0}")]
    Data(String),
}

impl From<RagError> for CrateError {
    fn from(err: RagError) -> Self {
        CrateError::Rag(err.to_string())
    }
}
