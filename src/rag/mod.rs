//! Retrieval-augmented generation module
//!
//! This module provides document indexing into the vector store and
//! question answering over the indexed chunks. The index goes through an
//! explicit lifecycle, `Uninitialized -> Indexing -> Ready`, and queries
//! issued outside `Ready` are rejected with a typed error rather than
//! searching an empty or partial index. Rebuilds are mutually exclusive and
//! fully replace the previous contents; a failed rebuild leaves the prior
//! index authoritative.

pub mod chunking;
mod error;
pub mod store;

pub use chunking::{ChunkOptions, chunk_text};
pub use error::RagError;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rig::{
    agent::AgentBuilder,
    completion::{CompletionModel, Prompt},
    embeddings::EmbeddingModel,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::model::Client;
use store::{EmbeddingRecord, VectorStore};

/// Number of nearest chunks retrieved per question
const DEFAULT_TOP_K: usize = 5;

/// Lifecycle state of the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RagStatus {
    /// No index has been built in this process
    Uninitialized,

    /// A rebuild is running; queries and further rebuilds are rejected
    Indexing,

    /// The index is complete and queryable
    Ready,
}

/// A chunk of a source document prior to embedding
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    /// The chunk text
    pub text: String,

    /// Source document the chunk came from
    pub source: String,

    /// Position of the chunk within its source
    pub position: usize,
}

/// Options for the retrieval system
#[derive(Debug, Clone)]
pub struct RagOptions {
    /// Chunking configuration used during indexing
    pub chunk_options: ChunkOptions,

    /// Number of nearest chunks retrieved per question
    pub top_k: usize,
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            chunk_options: ChunkOptions::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Outcome of a completed rebuild
#[derive(Debug, Clone, Serialize)]
pub struct RebuildSummary {
    /// Number of source documents read
    pub documents: usize,

    /// Number of chunks embedded and stored
    pub chunks: usize,

    /// When the rebuild finished
    #[serde(rename = "completedAt")]
    pub completed_at: DateTime<Utc>,
}

/// Retrieval system combining the vector store, the model client, and the
/// index lifecycle state
pub struct RagSystem<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    client: Client<C, E>,
    store: VectorStore,
    status: RwLock<RagStatus>,
    options: RagOptions,
}

impl<C, E> RagSystem<C, E>
where
    C: CompletionModel + Clone,
    E: EmbeddingModel,
{
    /// Create a retrieval system with default options
    pub fn new(client: Client<C, E>, store: VectorStore) -> Self {
        Self::with_options(client, store, RagOptions::default())
    }

    /// Create a retrieval system with explicit options
    pub fn with_options(client: Client<C, E>, store: VectorStore, options: RagOptions) -> Self {
        Self {
            client,
            store,
            status: RwLock::new(RagStatus::Uninitialized),
            options,
        }
    }

    /// Current lifecycle state of the index
    pub async fn status(&self) -> RagStatus {
        *self.status.read().await
    }

    /// Mark an already-populated store as ready
    ///
    /// Used by callers that reopen a persisted store without reindexing.
    /// Returns `true` only when the store holds chunks; an empty store is
    /// never marked ready.
    pub async fn restore(&self) -> Result<bool, RagError> {
        let mut status = self.status.write().await;
        if *status == RagStatus::Indexing {
            return Err(RagError::RebuildInProgress);
        }

        if self.store.count().await? > 0 {
            *status = RagStatus::Ready;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Rebuild the index from the given source documents
    ///
    /// Steps, strictly ordered: read every source file, chunk, embed all
    /// chunks, then atomically replace the store contents. Any failure
    /// aborts the rebuild, rolls the store back, and restores the previous
    /// lifecycle state.
    #[instrument(skip(self, sources), fields(sources = sources.len()))]
    pub async fn rebuild(&self, sources: &[PathBuf]) -> Result<RebuildSummary, RagError> {
        let previous = {
            let mut status = self.status.write().await;
            if *status == RagStatus::Indexing {
                return Err(RagError::RebuildInProgress);
            }
            let previous = *status;
            *status = RagStatus::Indexing;
            previous
        };

        match self.rebuild_inner(sources).await {
            Ok(summary) => {
                *self.status.write().await = RagStatus::Ready;
                info!(
                    documents = summary.documents,
                    chunks = summary.chunks,
                    "index rebuilt"
                );
                Ok(summary)
            }
            Err(e) => {
                *self.status.write().await = previous;
                Err(e)
            }
        }
    }

    async fn rebuild_inner(&self, sources: &[PathBuf]) -> Result<RebuildSummary, RagError> {
        let mut chunks: Vec<DocumentChunk> = Vec::new();
        for source in sources {
            let contents = tokio::fs::read_to_string(source).await?;
            let source_name = source.display().to_string();
            let pieces = chunk_text(&contents, &self.options.chunk_options);
            debug!(source = %source_name, chunks = pieces.len(), "chunked source document");
            chunks.extend(pieces.into_iter().enumerate().map(|(position, text)| {
                DocumentChunk {
                    text,
                    source: source_name.clone(),
                    position,
                }
            }));
        }

        // Embed everything before touching the store so a mid-flight
        // embedding failure cannot leave a partial index behind.
        let mut records = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(E::MAX_DOCUMENTS.max(1)) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self
                .client
                .embedding()
                .embed_texts(texts)
                .await
                .map_err(|e| RagError::Embedding(e.to_string()))?;

            if embeddings.len() != batch.len() {
                return Err(RagError::Embedding(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                records.push(EmbeddingRecord {
                    text: chunk.text.clone(),
                    source: chunk.source.clone(),
                    position: chunk.position,
                    embedding,
                });
            }
        }

        let stored = self.store.replace_all(&records).await?;

        Ok(RebuildSummary {
            documents: sources.len(),
            chunks: stored,
            completed_at: Utc::now(),
        })
    }

    /// Answer a question against the indexed documents
    ///
    /// Embeds the question, retrieves the nearest chunks, and asks the
    /// completion model with the retrieved context filled into a fixed
    /// template. Fails with [`RagError::NotReady`] unless the index is in
    /// the `Ready` state.
    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<String, RagError> {
        if self.status().await != RagStatus::Ready {
            return Err(RagError::NotReady);
        }

        let embedding = self
            .client
            .embedding()
            .embed_texts(vec![question.to_string()])
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("no embedding returned for question".to_string()))?;

        let retrieved = self.store.search(&embedding, self.options.top_k).await?;
        debug!(retrieved = retrieved.len(), "similarity search complete");

        let context = retrieved
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = answer_prompt(&context, question);

        let agent = AgentBuilder::new(self.client.completion().clone()).build();
        agent
            .prompt(prompt.as_str())
            .await
            .map_err(|e| RagError::Completion(e.to_string()))
    }
}

/// Fill the fixed answering template with retrieved context and question
fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an agent that will analyse and give statistical responses for the data.\n\n\
        CONTEXT:\n{context}\n\n\
        USER QUESTION: {question}"
    )
}
