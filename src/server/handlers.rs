//! Request handlers
//!
//! Thin boundary functions: validate the incoming request, invoke the
//! pipeline, and shape the JSON response. Input validation happens before
//! any browser or model work starts.

use axum::Json;
use axum::extract::State;
use rig::{completion::CompletionModel, embeddings::EmbeddingModel};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::audit::{self, AuditCategoryResult, AuditCheck};
use crate::browser::{BrowserSession, NavigationWait, extract_page_content};
use crate::composer;
use crate::rag::RagError;
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::summarize::summarize_content;

const ANALYZE_FAILED: &str = "Failed to analyze website";
const SCREENSHOT_FAILED: &str = "Failed to capture screenshot";
const AUDIT_FAILED: &str = "Failed to run Lighthouse analysis and generate feedback";
const BACKLINKS_FAILED: &str = "Failed to fetch backlinks";
const INIT_FAILED: &str = "Failed to initialize retrieval";

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub screenshot: String,
    #[serde(rename = "seoAnalysis")]
    pub seo_analysis: String,
}

#[derive(Debug, Serialize)]
pub struct ScreenshotResponse {
    pub screenshot: String,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    #[serde(rename = "lighthouseResults")]
    pub results: Vec<AuditCategoryResult>,
    #[serde(rename = "lighthouseAudits")]
    pub audits: Vec<AuditCheck>,
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub status: &'static str,
    pub documents: usize,
    pub chunks: usize,
    #[serde(rename = "completedAt")]
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// Pull a required string field out of a JSON body, rejecting any other
/// JSON type so `{"url": 123}` fails validation instead of reaching the
/// browser.
fn required_str<'a>(
    body: &'a Value,
    field: &str,
    message: &'static str,
) -> Result<&'a str, ApiError> {
    body.get(field)
        .and_then(Value::as_str)
        .ok_or(ApiError::BadRequest(message))
}

/// POST /analyze: screenshot plus content-based SEO recommendations
#[instrument(skip(state, body))]
pub async fn analyze<C, E>(
    State(state): State<AppState<C, E>>,
    Json(body): Json<Value>,
) -> Result<Json<AnalyzeResponse>, ApiError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let url = required_str(&body, "url", "Invalid URL provided")?.to_string();

    let session = BrowserSession::launch()
        .await
        .map_err(|e| ApiError::internal(ANALYZE_FAILED, e))?;
    let result = analyze_with_session(&state, &session, &url).await;
    session.close().await;

    let (screenshot, seo_analysis) = result?;
    Ok(Json(AnalyzeResponse {
        screenshot,
        seo_analysis,
    }))
}

/// The /analyze pipeline against an already-launched browser; split out so
/// the session is closed on every path.
async fn analyze_with_session<C, E>(
    state: &AppState<C, E>,
    session: &BrowserSession,
    url: &str,
) -> Result<(String, String), ApiError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let page = session
        .open(url, NavigationWait::NetworkIdle)
        .await
        .map_err(|e| ApiError::internal(ANALYZE_FAILED, e))?;

    let screenshot = page
        .screenshot_base64()
        .await
        .map_err(|e| ApiError::internal(ANALYZE_FAILED, e))?;

    let html = page
        .html()
        .await
        .map_err(|e| ApiError::internal(ANALYZE_FAILED, e))?;

    let content = extract_page_content(url, &html)
        .map_err(|e| ApiError::internal(ANALYZE_FAILED, e))?;
    let summarized = summarize_content(content);

    let analysis = composer::analyze_content(&state.client, url, &summarized)
        .await
        .map_err(|e| ApiError::internal(ANALYZE_FAILED, e))?;

    Ok((screenshot, analysis))
}

/// POST /screenshot: full-page capture only
#[instrument(skip(_state, body))]
pub async fn screenshot<C, E>(
    State(_state): State<AppState<C, E>>,
    Json(body): Json<Value>,
) -> Result<Json<ScreenshotResponse>, ApiError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let url = required_str(&body, "url", "Invalid URL provided")?.to_string();

    let session = BrowserSession::launch()
        .await
        .map_err(|e| ApiError::internal(SCREENSHOT_FAILED, e))?;
    let result = async {
        let page = session
            .open(&url, NavigationWait::Load)
            .await
            .map_err(|e| ApiError::internal(SCREENSHOT_FAILED, e))?;
        page.screenshot_base64()
            .await
            .map_err(|e| ApiError::internal(SCREENSHOT_FAILED, e))
    }
    .await;
    session.close().await;

    Ok(Json(ScreenshotResponse {
        screenshot: result?,
    }))
}

/// POST /lighthouse: audit plus LLM feedback on the worst issues
#[instrument(skip(state, body))]
pub async fn lighthouse<C, E>(
    State(state): State<AppState<C, E>>,
    Json(body): Json<Value>,
) -> Result<Json<AuditResponse>, ApiError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let url = required_str(&body, "url", "Invalid URL provided")?;

    let outcome = audit::run_audit(&state.config.audit_command, url)
        .await
        .map_err(|e| ApiError::internal(AUDIT_FAILED, e))?;

    let feedback = composer::review_audit(&state.client, &outcome.checks)
        .await
        .map_err(|e| ApiError::internal(AUDIT_FAILED, e))?;

    Ok(Json(AuditResponse {
        results: outcome.categories,
        audits: outcome.checks,
        feedback,
    }))
}

/// GET /backlinks: passthrough of the third-party live-backlinks response
#[instrument(skip(state))]
pub async fn backlinks<C, E>(
    State(state): State<AppState<C, E>>,
) -> Result<Json<Value>, ApiError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let client = state
        .backlinks
        .as_ref()
        .ok_or(ApiError::Internal("Backlink credentials not configured"))?;

    let response = client
        .live_backlinks()
        .await
        .map_err(|e| ApiError::internal(BACKLINKS_FAILED, e))?;

    Ok(Json(response))
}

/// /init (any method): rebuild the retrieval index
#[instrument(skip(state))]
pub async fn init<C, E>(
    State(state): State<AppState<C, E>>,
) -> Result<Json<InitResponse>, ApiError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let summary = state
        .rag
        .rebuild(&state.config.source_files)
        .await
        .map_err(|e| match e {
            RagError::RebuildInProgress | RagError::NotReady => ApiError::from(e),
            other => ApiError::internal(INIT_FAILED, other),
        })?;

    Ok(Json(InitResponse {
        status: "ok",
        documents: summary.documents,
        chunks: summary.chunks,
        completed_at: summary.completed_at,
    }))
}

/// POST /query: answer a question against the indexed documents
#[instrument(skip(state, body))]
pub async fn query<C, E>(
    State(state): State<AppState<C, E>>,
    Json(body): Json<Value>,
) -> Result<Json<QueryResponse>, ApiError>
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let question = required_str(&body, "question", "Invalid question provided")?;

    let answer = state.rag.answer(question).await?;

    Ok(Json(QueryResponse { answer }))
}
