//! Vector store operations
//!
//! LibSQL-backed storage for embedded document chunks. The store has
//! full-replace semantics: reindexing deletes every existing row and inserts
//! the new set inside one transaction, so a failed rebuild leaves the
//! previous contents authoritative.

use crate::model::embedding::EmbeddingConversion;
use crate::rag::error::RagError;
use libsql::{Connection, params};
use rig::embeddings::Embedding;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// A chunk with its embedding, ready for persistence
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    /// The chunk text
    pub text: String,

    /// Source document the chunk came from
    pub source: String,

    /// Position of the chunk within its source
    pub position: usize,

    /// The chunk's embedding vector
    pub embedding: Embedding,
}

/// A chunk returned from a similarity search
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// The chunk text
    pub text: String,

    /// Source document the chunk came from
    pub source: String,

    /// Position of the chunk within its source
    pub position: i64,
}

/// Vector store over a local LibSQL database
#[derive(Clone)]
pub struct VectorStore {
    conn: Connection,
    dimensions: usize,
}

impl VectorStore {
    /// Open (or create) a store at the given path
    #[instrument]
    pub async fn open(path: &Path, dimensions: usize) -> Result<Self, RagError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| RagError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| RagError::Connection(format!("Failed to connect to database: {}", e)))?;

        initialize_schema(&conn, dimensions).await?;

        Ok(Self { conn, dimensions })
    }

    /// Dimensions of the stored embedding vectors
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Replace the entire store contents with the given records
    ///
    /// Runs as a single transaction: existing rows are deleted, then every
    /// record is inserted. On any failure the transaction rolls back and
    /// the previous contents remain in place.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn replace_all(&self, records: &[EmbeddingRecord]) -> Result<usize, RagError> {
        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| RagError::Transaction(format!("Failed to start transaction: {}", e)))?;

        tx.execute("DELETE FROM chunks", params![])
            .await
            .map_err(|e| RagError::Query(format!("Failed to clear chunks: {}", e)))?;

        for record in records {
            tx.execute(
                "INSERT INTO chunks (source, position, text, embedding) VALUES (?, ?, ?, ?)",
                params![
                    record.source.clone(),
                    record.position as i64,
                    record.text.clone(),
                    libsql::Value::Blob(record.embedding.to_binary()),
                ],
            )
            .await
            .map_err(|e| RagError::Query(format!("Failed to insert chunk: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| RagError::Transaction(format!("Failed to commit transaction: {}", e)))?;

        debug!(records = records.len(), "replaced store contents");
        Ok(records.len())
    }

    /// Number of chunks currently stored
    pub async fn count(&self) -> Result<i64, RagError> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM chunks", params![])
            .await
            .map_err(|e| RagError::Query(format!("Failed to count chunks: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get(0)
                .map_err(|e| RagError::Data(format!("Failed to get count: {}", e))),
            Ok(None) => Ok(0),
            Err(e) => Err(RagError::Data(format!("Failed to get count: {}", e))),
        }
    }

    /// Return the `limit` nearest chunks to the query embedding
    #[instrument(skip(self, embedding))]
    pub async fn search(
        &self,
        embedding: &Embedding,
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, RagError> {
        let mut rows = self
            .conn
            .query(
                "SELECT c.text, c.source, c.position
                 FROM vector_top_k('chunks_idx', ?, ?) AS v
                 JOIN chunks c ON c.rowid = v.id",
                params![
                    libsql::Value::Blob(embedding.to_binary()),
                    limit as i64,
                ],
            )
            .await
            .map_err(|e| RagError::Query(format!("Failed to run vector search: {}", e)))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(RetrievedChunk {
                text: row
                    .get(0)
                    .map_err(|e| RagError::Data(format!("Failed to get text: {}", e)))?,
                source: row
                    .get(1)
                    .map_err(|e| RagError::Data(format!("Failed to get source: {}", e)))?,
                position: row
                    .get(2)
                    .map_err(|e| RagError::Data(format!("Failed to get position: {}", e)))?,
            });
        }

        Ok(results)
    }
}

/// Create the chunks table and its vector index
async fn initialize_schema(conn: &Connection, dimensions: usize) -> Result<(), RagError> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source TEXT NOT NULL,
                position INTEGER NOT NULL,
                text TEXT NOT NULL,
                embedding F32_BLOB({}) NOT NULL
            )",
            dimensions
        ),
        params![],
    )
    .await
    .map_err(|e| RagError::Query(format!("Failed to create chunks table: {}", e)))?;

    // This fails if the vector extension is unavailable; searches will then
    // error, but the store itself stays usable for indexing.
    let vector_index = conn
        .execute(
            "CREATE INDEX IF NOT EXISTS chunks_idx ON chunks (libsql_vector_idx(embedding))",
            params![],
        )
        .await;

    if let Err(e) = vector_index {
        warn!(error = %e, "failed to create vector index; vector search will not be available");
    }

    Ok(())
}
