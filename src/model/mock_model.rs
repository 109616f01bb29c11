//! # Mock Models for Testing
//!
//! Provides a `MockCompletionModel` and a `MockEmbeddingModel` implementing
//! the `rig` traits for use in tests, so the recommendation and retrieval
//! pipelines can be exercised without real API calls.

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    embeddings::{Embedding, EmbeddingError, EmbeddingModel},
    one_or_many::OneOrMany,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A mock completion model that returns a predefined response.
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    response: Arc<Mutex<Option<OneOrMany<AssistantContent>>>>,
}

impl MockCompletionModel {
    /// Creates a mock that returns an empty text response until configured.
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
        }
    }

    /// Sets the response that the mock model should return.
    pub async fn set_response(&self, response: OneOrMany<AssistantContent>) {
        let mut guard = self.response.lock().await;
        *guard = Some(response);
    }

    /// Helper to create a simple text response.
    pub async fn set_text_response(&self, text: &str) {
        let response = OneOrMany::one(AssistantContent::text(text));
        self.set_response(response).await;
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        let response = {
            let guard = self.response.lock().await;
            guard.clone()
        };
        match response {
            Some(result) => Ok(CompletionResponse {
                choice: result,
                raw_response: "".to_string(),
            }),
            None => Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text("")),
                raw_response: "".to_string(),
            }),
        }
    }
}

/// A mock embedding model producing deterministic vectors from text bytes.
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dims: usize,
}

impl MockEmbeddingModel {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    const MAX_DOCUMENTS: usize = 64;

    fn ndims(&self) -> usize {
        self.dims
    }

    async fn embed_texts(
        &self,
        texts: impl IntoIterator<Item = String> + Send,
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts
            .into_iter()
            .map(|document| {
                let mut vec = vec![0.0f64; self.dims];
                for (i, byte) in document.bytes().enumerate() {
                    vec[i % self.dims] += f64::from(byte) / 255.0;
                }
                Embedding { document, vec }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedding_is_deterministic() {
        let model = MockEmbeddingModel::new(4);

        let first = model
            .embed_texts(vec!["same input".to_string()])
            .await
            .unwrap();
        let second = model
            .embed_texts(vec!["same input".to_string()])
            .await
            .unwrap();

        assert_eq!(first[0].vec, second[0].vec);
        assert_eq!(first[0].vec.len(), 4);
    }
}
