//! # seolens - LLM-assisted SEO analysis service
//!
//! This crate implements a web service that analyzes pages for SEO quality.
//! Given a URL it drives a headless Chrome session to capture a full-page
//! screenshot and extract the rendered DOM content, runs a Lighthouse audit,
//! and turns the collected data into human-readable recommendations through
//! an LLM completion endpoint. A companion retrieval-augmented-generation
//! path embeds text documents into a vector store and answers ad-hoc
//! questions against them.
//!
//! ## Features
//!
//! - Headless-browser content extraction with a network-idle readiness wait
//! - Full-page screenshot capture, base64-encoded
//! - Lighthouse audits across performance, accessibility, best practices,
//!   and SEO, with LLM feedback on the most critical issues
//! - Document indexing into a LibSQL vector store with full-replace
//!   semantics and an explicit initialization state machine
//! - Top-k similarity retrieval plus LLM answering
//! - Rate-limited model access with mockable completion/embedding traits
//! - Async API with Tokio, JSON HTTP surface with axum
//!
//! ## Example
//!
//! ```rust,no_run
//! use seolens::config::AppConfig;
//! use seolens::model::Client;
//! use seolens::rag::RagSystem;
//! use seolens::rag::store::VectorStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let client = Client::new_openai(&config);
//!
//!     let store = VectorStore::open(&config.database_path, config.embedding_dimensions).await?;
//!     let rag = Arc::new(RagSystem::new(client.clone(), store));
//!
//!     let summary = rag.rebuild(&config.source_files).await?;
//!     println!("indexed {} chunks", summary.chunks);
//!
//!     let answer = rag.answer("Which pages mention pricing?").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

mod error;

pub mod audit;
pub mod backlinks;
pub mod browser;
pub mod composer;
pub mod config;
pub mod model;
pub mod rag;
pub mod server;
pub mod summarize;

pub use error::Error;

/// Re-export of commonly used types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
