//! # LLM Client Module
//!
//! This module provides a unified client interface for working with LLM
//! services, with built-in rate limiting to prevent API quota exhaustion.
//!
//! ## Key Components
//!
//! - `Client`: A unified client that wraps both completion and embedding models
//! - `RateLimitedCompletionModel`: A wrapper that adds rate limiting to any completion model
//! - `RateLimitedEmbeddingModel`: A wrapper that adds rate limiting to any embedding model
//! - `EmbeddingConversion`: Utilities for converting between embedding formats
//!
//! ## Features
//!
//! - Configurable rate limiting for completion and embedding quotas
//! - Type-safe model integration with the `rig` framework
//! - Conversion utilities for embedding vectors
//! - Mock models for exercising the pipeline without network access

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use ratelimited_completion::RateLimitedCompletionModel;
use ratelimited_embedding::RateLimitedEmbeddingModel;
use rig::{completion::CompletionModel, embeddings::EmbeddingModel, providers::openai};

use crate::config::AppConfig;

pub mod embedding;
#[cfg(test)]
pub mod mock_model;
pub mod ratelimited_completion;
pub mod ratelimited_embedding;

pub use embedding::EmbeddingConversion;

/// Rate-limited completion model backed by the OpenAI provider
pub type OpenAiCompletionModel = RateLimitedCompletionModel<openai::completion::CompletionModel>;

/// Rate-limited embedding model backed by the OpenAI provider
pub type OpenAiEmbeddingModel = RateLimitedEmbeddingModel<openai::embedding::EmbeddingModel>;

/// Client used by the OpenAI-backed service
pub type OpenAiClient = Client<OpenAiCompletionModel, OpenAiEmbeddingModel>;

#[derive(Debug, Clone)]
pub struct Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    completion_model: C,
    embedding_model: E,
}

pub struct RateLimitResponse<T> {
    #[allow(dead_code)]
    response: T,
}

impl OpenAiClient {
    /// Create an OpenAI-backed client from the validated configuration
    pub fn new_openai(config: &AppConfig) -> Self {
        let openai_client = openai::Client::new(&config.openai_api_key);

        let completion_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(500).expect("must create rate limit"),
        ));
        let embedding_limiter = RateLimiter::direct(Quota::per_minute(
            NonZeroU32::new(3000).expect("must create rate limit"),
        ));

        let completion_model = RateLimitedCompletionModel::new(
            openai_client.completion_model(&config.completion_model),
            completion_limiter,
        );
        let embedding_model = RateLimitedEmbeddingModel::new(
            openai_client.embedding_model(&config.embedding_model),
            embedding_limiter,
        );

        Self {
            completion_model,
            embedding_model,
        }
    }
}

impl<C, E> Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    /// Build a client from already-constructed models
    pub fn new(completion_model: C, embedding_model: E) -> Self {
        Self {
            completion_model,
            embedding_model,
        }
    }

    pub fn completion(&self) -> &C {
        &self.completion_model
    }

    pub fn embedding(&self) -> &E {
        &self.embedding_model
    }
}
