//! Batched, rate-limited corpus indexing

use std::sync::Arc;
use std::time::Duration;

use tracing::error;
use tracing::info;
use tracing::warn;

use super::CorpusSource;
use super::Document;
use crate::config::AppConfig;
use crate::database::VectorIndex;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::RecipeRagError;

/// Batching policy for corpus loads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl LoadOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.corpus.batch_size,
            batch_delay: config.batch_delay(),
        }
    }
}

/// Counters for one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub total_rows: usize,
    pub start_offset: usize,
    pub embedded: usize,
    pub batches: usize,
}

/// Result of [`CorpusLoader::ensure_indexed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Tagged documents already exist; nothing was read or embedded
    AlreadyIndexed,
    /// Source rows were embedded and stored
    Indexed(LoadStats),
}

impl LoadOutcome {
    /// Whether this call wrote anything to the index
    #[must_use]
    pub const fn loaded(&self) -> bool {
        matches!(self, Self::Indexed(_))
    }
}

/// Snapshot of a dataset tag in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStatus {
    pub dataset_tag: String,
    pub indexed: usize,
    /// Row count of the source, when one was read
    pub source_rows: Option<usize>,
}

impl LoadStatus {
    /// Rows still waiting to be embedded, if the source size is known
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        self.source_rows
            .map(|rows| rows.saturating_sub(self.indexed))
    }

    /// Whether every source row is indexed, if the source size is known
    #[must_use]
    pub fn complete(&self) -> Option<bool> {
        self.source_rows.map(|rows| self.indexed >= rows)
    }
}

/// Embeds corpus rows into a [`VectorIndex`] under one dataset tag
pub struct CorpusLoader {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    dataset_tag: String,
    options: LoadOptions,
}

impl CorpusLoader {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        dataset_tag: impl Into<String>,
        options: LoadOptions,
    ) -> Self {
        Self {
            index,
            embedder,
            dataset_tag: dataset_tag.into(),
            options,
        }
    }

    #[must_use]
    pub fn dataset_tag(&self) -> &str {
        &self.dataset_tag
    }

    /// Index `source` unless any document already carries the dataset tag.
    ///
    /// The presence check is the only completeness test; a partially loaded
    /// tag counts as indexed and has to be finished with [`Self::resume`].
    pub async fn ensure_indexed(&self, source: &dyn CorpusSource) -> Result<LoadOutcome> {
        if self.index.has_tagged(&self.dataset_tag).await? {
            info!(
                "Documents tagged {} already indexed, skipping load",
                self.dataset_tag
            );
            return Ok(LoadOutcome::AlreadyIndexed);
        }

        info!("No documents tagged {}, loading {}", self.dataset_tag, source.describe());
        let rows = source.load()?;
        let stats = self.index_from(rows, 0).await?;
        Ok(LoadOutcome::Indexed(stats))
    }

    /// Continue a partial load: skip as many rows as the index already holds
    /// for the tag and embed the rest in source order.
    pub async fn resume(&self, source: &dyn CorpusSource) -> Result<LoadStats> {
        let existing = self.index.count_tagged(&self.dataset_tag).await?;
        let rows = source.load()?;
        let total = rows.len();

        if existing >= total {
            if existing > total {
                warn!(
                    "Index holds {} documents tagged {} but the source has only {} rows",
                    existing, self.dataset_tag, total
                );
            }
            info!("Nothing to resume for {}: {}/{} indexed", self.dataset_tag, existing, total);
            return Ok(LoadStats {
                total_rows: total,
                start_offset: existing,
                ..LoadStats::default()
            });
        }

        info!(
            "Resuming {} from row {} of {} ({} remaining)",
            self.dataset_tag,
            existing,
            total,
            total - existing
        );
        self.index_from(rows, existing).await
    }

    /// Delete every document carrying the dataset tag
    pub async fn purge(&self) -> Result<u64> {
        let removed = self.index.purge_tagged(&self.dataset_tag).await?;
        info!("Purged {} documents tagged {}", removed, self.dataset_tag);
        Ok(removed)
    }

    /// Indexed count for the tag, plus the source size when a source is given
    pub async fn status(&self, source: Option<&dyn CorpusSource>) -> Result<LoadStatus> {
        let indexed = self.index.count_tagged(&self.dataset_tag).await?;
        let source_rows = match source {
            Some(source) => Some(source.load()?.len()),
            None => None,
        };
        Ok(LoadStatus {
            dataset_tag: self.dataset_tag.clone(),
            indexed,
            source_rows,
        })
    }

    fn effective_batch_size(&self) -> Result<usize> {
        if self.options.batch_size == 0 {
            return Err(RecipeRagError::ConfigError(
                "corpus batch size must be at least 1".to_string(),
            ));
        }
        // A provider reporting a zero cap still gets single-row batches
        Ok(self
            .options
            .batch_size
            .min(self.embedder.max_batch_size())
            .max(1))
    }

    /// Tag and embed `rows[offset..]`, one batch at a time, pausing between batches
    async fn index_from(&self, rows: Vec<Document>, offset: usize) -> Result<LoadStats> {
        let batch_size = self.effective_batch_size()?;
        let total_rows = rows.len();
        let pending: Vec<Document> = rows
            .into_iter()
            .skip(offset)
            .map(|doc| doc.tagged(&self.dataset_tag))
            .collect();
        let total_batches = pending.len().div_ceil(batch_size);

        let mut stats = LoadStats {
            total_rows,
            start_offset: offset,
            ..LoadStats::default()
        };

        for (batch_idx, chunk) in pending.chunks(batch_size).enumerate() {
            let first = offset + batch_idx * batch_size;
            let last = first + chunk.len() - 1;
            info!(
                "Embedding batch {}/{} (docs {}-{})",
                batch_idx + 1,
                total_batches,
                first,
                last
            );

            let texts: Vec<String> = chunk.iter().map(|doc| doc.content.clone()).collect();
            let stored = async {
                let embeddings = self.embedder.embed_batch(&texts).await?;
                self.index.add_documents(chunk, embeddings).await
            }
            .await;

            if let Err(e) = stored {
                error!(
                    "Batch {}/{} (docs {}-{}) failed after {} documents stored: {}",
                    batch_idx + 1,
                    total_batches,
                    first,
                    last,
                    stats.embedded,
                    e
                );
                return Err(RecipeRagError::CorpusError(format!(
                    "batch {}/{} (docs {}-{}) failed: {}; run `resume` to continue from the stored count",
                    batch_idx + 1,
                    total_batches,
                    first,
                    last,
                    e
                )));
            }

            stats.embedded += chunk.len();
            stats.batches += 1;

            if batch_idx + 1 < total_batches && !self.options.batch_delay.is_zero() {
                tokio::time::sleep(self.options.batch_delay).await;
            }
        }

        info!(
            "Indexed {} documents tagged {} in {} batches",
            stats.embedded, self.dataset_tag, stats.batches
        );
        Ok(stats)
    }
}
