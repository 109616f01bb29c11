//! HTTP server module
//!
//! Builds the axum router over the shared application state. Routes are
//! POST-only where the reference API is POST-only; axum's method routing
//! answers other verbs with 405 and an `Allow` header.

mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get, post};
use rig::{completion::CompletionModel, embeddings::EmbeddingModel};

use crate::backlinks::BacklinksClient;
use crate::config::AppConfig;
use crate::model::Client;
use crate::rag::RagSystem;

/// Shared state handed to every handler
pub struct AppState<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    pub config: Arc<AppConfig>,
    pub client: Client<C, E>,
    pub rag: Arc<RagSystem<C, E>>,
    pub backlinks: Option<Arc<BacklinksClient>>,
}

impl<C, E> Clone for AppState<C, E>
where
    C: CompletionModel + Clone,
    E: EmbeddingModel + Clone,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            client: self.client.clone(),
            rag: Arc::clone(&self.rag),
            backlinks: self.backlinks.clone(),
        }
    }
}

impl<C, E> AppState<C, E>
where
    C: CompletionModel + Clone,
    E: EmbeddingModel + Clone,
{
    /// Assemble the state from its parts, wiring the backlink client only
    /// when credentials were configured.
    pub fn new(config: AppConfig, client: Client<C, E>, rag: Arc<RagSystem<C, E>>) -> Self {
        let backlinks = config
            .dataforseo
            .as_ref()
            .map(|cfg| Arc::new(BacklinksClient::new(cfg)));

        Self {
            config: Arc::new(config),
            client,
            rag,
            backlinks,
        }
    }
}

/// Build the application router
pub fn router<C, E>(state: AppState<C, E>) -> Router
where
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/analyze", post(handlers::analyze::<C, E>))
        .route("/screenshot", post(handlers::screenshot::<C, E>))
        .route("/lighthouse", post(handlers::lighthouse::<C, E>))
        .route("/backlinks", get(handlers::backlinks::<C, E>))
        .route("/init", any(handlers::init::<C, E>))
        .route("/query", post(handlers::query::<C, E>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock_model::{MockCompletionModel, MockEmbeddingModel};
    use crate::rag::store::VectorStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use std::io::Write;
    use tower::ServiceExt;

    async fn test_state(
        temp_dir: &tempfile::TempDir,
    ) -> AppState<MockCompletionModel, MockEmbeddingModel> {
        let source_path = temp_dir.path().join("corpus.txt");
        let mut file = std::fs::File::create(&source_path).unwrap();
        writeln!(file, "Descriptive titles help search ranking.").unwrap();
        writeln!(file, "Alt text helps image discoverability.").unwrap();

        let config = AppConfig::from_lookup(|var| match var {
            "OPENAI_API_KEY" => Some("test-key".to_string()),
            "SEOLENS_SOURCE_FILES" => Some(source_path.display().to_string()),
            "SEOLENS_EMBEDDING_DIMENSIONS" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();

        let store = VectorStore::open(&temp_dir.path().join("test.db"), 4)
            .await
            .unwrap();
        let client = Client::new(MockCompletionModel::new(), MockEmbeddingModel::new(4));
        let rag = Arc::new(RagSystem::new(client.clone(), store));

        AppState::new(config, client, rag)
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_string_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&temp_dir).await);

        let response = app
            .oneshot(json_post("/analyze", "{\"url\": 123}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid URL provided");
    }

    #[tokio::test]
    async fn test_analyze_rejects_missing_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&temp_dir).await);

        let response = app.oneshot(json_post("/analyze", "{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_on_post_route_returns_405_with_allow() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&temp_dir).await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/analyze")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let allow = response
            .headers()
            .get(header::ALLOW)
            .expect("Allow header must be set")
            .to_str()
            .unwrap();
        assert!(allow.contains("POST"));
    }

    #[tokio::test]
    async fn test_query_before_init_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&temp_dir).await);

        let response = app
            .oneshot(json_post("/query", "{\"question\": \"anything\"}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .contains("not initialized")
        );
    }

    #[tokio::test]
    async fn test_query_rejects_non_string_question() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&temp_dir).await);

        let response = app
            .oneshot(json_post("/query", "{\"question\": 5}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_init_then_query_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = test_state(&temp_dir).await;
        state
            .client
            .completion()
            .set_text_response("Both lines are about on-page SEO.")
            .await;
        let app = router(state);

        let init_response = app
            .clone()
            .oneshot(json_post("/init", "{}"))
            .await
            .unwrap();
        assert_eq!(init_response.status(), StatusCode::OK);

        let body = init_response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["chunks"].as_u64().unwrap() > 0);

        let query_response = app
            .oneshot(json_post("/query", "{\"question\": \"What is covered?\"}"))
            .await
            .unwrap();
        assert_eq!(query_response.status(), StatusCode::OK);

        let body = query_response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["answer"], "Both lines are about on-page SEO.");
    }

    #[tokio::test]
    async fn test_backlinks_without_credentials_is_a_server_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&temp_dir).await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/backlinks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
