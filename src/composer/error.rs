//! Error types for the composer module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for recommendation composition
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The completion call failed
    #[error("Completion error: {0}")]
    Completion(String),

    /// Prompt data could not be serialized
    #[error("Template error: {0}")]
    Template(#[from] serde_json::Error),
}

impl From<ComposeError> for CrateError {
    fn from(err: ComposeError) -> Self {
        CrateError::Compose(err.to_string())
    }
}
