//! Page quality audit module
//!
//! Runs Lighthouse against a URL and shapes its JSON report into
//! per-category results and a flat list of individual check results. The
//! audit owns its browser lifecycle: Lighthouse is spawned as a child
//! process with its own headless Chrome, independent of the session used
//! for extraction and screenshots, and both are torn down when the process
//! exits.

mod error;
mod report;

pub use error::AuditError;
pub use report::shape_report;

use std::path::Path;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// The four categories every audit runs, in response order
pub const AUDIT_CATEGORIES: [&str; 4] = ["performance", "accessibility", "best-practices", "seo"];

/// Per-category audit outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditCategoryResult {
    /// Category identifier, e.g. `performance`
    pub category: String,

    /// Category score as an integer percentage
    pub score: u8,

    /// Human-readable category title
    pub title: String,

    /// Category description
    pub description: String,

    /// References to the checks contributing to this category
    #[serde(rename = "auditRefs")]
    pub audit_refs: Vec<AuditRef>,
}

/// Reference from a category to one of its checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRef {
    pub id: String,
    pub weight: f64,
}

/// A single audit check result
///
/// A `score` of `None` means the check was not applicable, which is distinct
/// from a score of zero in all downstream filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditCheck {
    pub id: String,
    pub title: String,
    pub description: String,
    pub score: Option<f64>,

    #[serde(rename = "displayValue", skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,

    #[serde(rename = "numericValue", skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
}

/// The shaped outcome of an audit run
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// One result per category in [`AUDIT_CATEGORIES`] order
    pub categories: Vec<AuditCategoryResult>,

    /// Every individual check, in report order
    pub checks: Vec<AuditCheck>,
}

/// Run a Lighthouse audit against a URL
///
/// # Arguments
///
/// * `command` - The Lighthouse executable
/// * `url` - The URL to audit
///
/// # Returns
///
/// The shaped per-category results and flat check list
#[instrument(skip(command))]
pub async fn run_audit(command: &Path, url: &str) -> Result<AuditOutcome, AuditError> {
    info!(url, "starting audit");

    let output = Command::new(command)
        .arg(url)
        .arg("--output=json")
        .arg("--output-path=stdout")
        .arg("--quiet")
        .arg("--chrome-flags=--headless --no-sandbox")
        .arg(format!("--only-categories={}", AUDIT_CATEGORIES.join(",")))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        debug!(stderr = %stderr.trim(), "audit process stderr");
    }

    if !output.status.success() {
        return Err(AuditError::Failed(if stderr.is_empty() {
            format!("audit process exited with {}", output.status)
        } else {
            stderr.trim().to_string()
        }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let outcome = shape_report(&stdout)?;

    info!(
        url,
        categories = outcome.categories.len(),
        checks = outcome.checks.len(),
        "audit complete"
    );
    Ok(outcome)
}
