//! Vector storage for the recipe corpus
//!
//! [`VectorIndex`] is the narrow interface the loader and retriever depend on.
//! [`Database`] stores documents in PostgreSQL with pgvector; [`InMemoryIndex`]
//! keeps them in process for tests and offline runs.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::Document;
use crate::models::MetadataFilter;
use crate::RecipeRagError;
use crate::Result;

mod documents;
pub mod memory;
mod schema;

pub use memory::InMemoryIndex;

/// Store of embedded documents partitioned by dataset tag
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Whether at least one document carries `dataset_tag`
    async fn has_tagged(&self, dataset_tag: &str) -> Result<bool>;

    /// Number of documents carrying `dataset_tag`
    async fn count_tagged(&self, dataset_tag: &str) -> Result<usize>;

    /// Store documents with their embeddings; all or nothing per call
    async fn add_documents(&self, documents: &[Document], embeddings: Vec<Vec<f32>>)
        -> Result<()>;

    /// Top-k documents nearest to `embedding` among those matching `filter`, best first
    async fn similarity_search(
        &self,
        embedding: &[f32],
        filter: &MetadataFilter,
        k: usize,
    ) -> Result<Vec<Document>>;

    /// Delete every document carrying `dataset_tag`, returning how many were removed
    async fn purge_tagged(&self, dataset_tag: &str) -> Result<u64>;
}

pub(crate) fn ensure_same_length(documents: &[Document], embeddings: &[Vec<f32>]) -> Result<()> {
    if documents.len() == embeddings.len() {
        Ok(())
    } else {
        Err(RecipeRagError::Custom(format!(
            "{} documents but {} embeddings",
            documents.len(),
            embeddings.len()
        )))
    }
}

/// PostgreSQL + pgvector document store
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    table: String,
    dimension: usize,
}

impl Database {
    /// Wrap an existing pool; `table` must be a plain SQL identifier
    pub fn new(pool: PgPool, table: impl Into<String>, dimension: usize) -> Result<Self> {
        let table = table.into();
        if table.is_empty()
            || !table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            || table.starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(RecipeRagError::ConfigError(format!(
                "Invalid table name: {table:?}"
            )));
        }

        Ok(Self {
            pool,
            table,
            dimension,
        })
    }

    /// Create a new database instance from configuration
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections())
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout()));

        let pool = pool_options.connect(config.database_url()).await?;

        tracing::info!(
            "Database pool configured: max_connections={}, min_connections={}",
            config.max_connections(),
            config.min_connections()
        );

        Self::new(
            pool,
            config.database.table_name.clone(),
            config.embedding_dimension(),
        )
    }
}
