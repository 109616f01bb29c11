//! Error types for the audit module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for page-audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    /// The audit process could not be spawned
    #[error("Failed to run audit command: {0}")]
    Spawn(#[from] std::io::Error),

    /// The audit process exited with a failure status
    #[error("Audit failed: {0}")]
    Failed(String),

    /// The audit report could not be parsed
    #[error("Failed to parse audit report: {0}")]
    Parse(#[from] serde_json::Error),

    /// The report is missing one of the required categories
    #[error("Audit report missing category: {0}")]
    MissingCategory(String),
}

impl From<AuditError> for CrateError {
    fn from(err: AuditError) -> Self {
        CrateError::Audit(err.to_string())
    }
}
