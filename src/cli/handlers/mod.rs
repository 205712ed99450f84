//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - corpus: Index, resume, purge and status of the dataset tag
//! - ask: Terminal cooking chat
//! - serve: API server
//! - info: Configuration display

pub mod ask;
pub mod corpus;
pub mod info;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

// Re-export all public handlers
pub use ask::*;
pub use corpus::*;
pub use info::*;
pub use serve::*;

use crate::config::AppConfig;
use crate::corpus::CorpusLoader;
use crate::corpus::CsvSource;
use crate::corpus::LoadOptions;
use crate::database::Database;
use crate::database::VectorIndex;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::Result;

/// Connect to the document store, creating the schema if missing
async fn connect_index(config: &AppConfig) -> Result<Arc<dyn VectorIndex>> {
    let database = Database::from_config(config).await?;
    database.init_schema().await?;
    Ok(Arc::new(database))
}

fn embedder(config: &AppConfig) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(EmbeddingClient::from_app_config(config)?))
}

async fn corpus_loader(config: &AppConfig) -> Result<CorpusLoader> {
    Ok(CorpusLoader::new(
        connect_index(config).await?,
        embedder(config)?,
        config.dataset_tag(),
        LoadOptions::from_config(config),
    ))
}

fn csv_source(config: &AppConfig, source: Option<PathBuf>) -> CsvSource {
    CsvSource::new(source.unwrap_or_else(|| PathBuf::from(&config.corpus.source_path)))
}
