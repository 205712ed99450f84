//! Embeddings generation module
//!
//! Text embeddings come from a hosted provider behind the [`Embedder`] trait:
//! - Cohere (`embed-english-v3.0`, separate query/document input types)
//! - OpenAI-compatible `/embeddings` endpoints
//! - Ollama (local models)
//!
//! # Examples
//!
//! ```rust,no_run
//! use recipe_rag::config::AppConfig;
//! use recipe_rag::embeddings::{Embedder, EmbeddingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_app_config(&config)?;
//!
//!     let embedding = client.embed("quick vegan dinner").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;

use async_trait::async_trait;
pub use client::EmbeddingClient;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;

/// Per-request item cap of the Cohere embed endpoint
pub const COHERE_MAX_BATCH_SIZE: usize = 96;

/// Per-request item cap used for OpenAI-compatible endpoints
pub const OPENAI_MAX_BATCH_SIZE: usize = 2048;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Cohere embed API
    Cohere,
    /// `OpenAI` embeddings API and compatible servers
    #[serde(alias = "openai")]
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

impl EmbeddingProvider {
    /// Largest number of texts a single request may carry
    #[must_use]
    pub const fn max_batch_size(self) -> usize {
        match self {
            Self::Cohere => COHERE_MAX_BATCH_SIZE,
            Self::OpenAI => OPENAI_MAX_BATCH_SIZE,
            // One request per text, batching happens client-side
            Self::Ollama => usize::MAX,
        }
    }

    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

/// Capability to turn text into vectors.
///
/// `embed` is used for search queries and `embed_batch` for corpus documents; providers
/// with asymmetric models (Cohere) embed the two sides differently.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single search query
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of documents, one vector per input in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Largest batch accepted by `embed_batch`
    fn max_batch_size(&self) -> usize;
}
