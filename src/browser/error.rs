//! Error types for the browser module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for browser automation and content extraction
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Browser process could not be configured or launched
    #[error("Browser launch error: {0}")]
    Launch(String),

    /// Navigation to the target URL failed
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Screenshot capture failed
    #[error("Screenshot error: {0}")]
    Screenshot(String),

    /// Rendered document could not be retrieved
    #[error("Content error: {0}")]
    Content(String),

    /// HTML parsing error
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<BrowserError> for CrateError {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::UrlParse(e) => CrateError::Other(format!("URL parse error: {}", e)),
            _ => CrateError::Browser(err.to_string()),
        }
    }
}
