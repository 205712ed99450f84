//! In-process vector index.
//!
//! Brute-force cosine similarity over every stored vector. Meant for tests,
//! demos and small corpora; it forgets everything when the process exits.

use std::sync::RwLock;

use async_trait::async_trait;

use super::ensure_same_length;
use super::VectorIndex;
use crate::models::Document;
use crate::models::MetadataFilter;
use crate::RecipeRagError;
use crate::Result;

#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: RwLock<Vec<(Document, Vec<f32>)>>,
}

impl InMemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored documents across all tags
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of stored documents in insertion order
    pub fn documents(&self) -> Vec<Document> {
        self.entries
            .read()
            .map(|e| e.iter().map(|(doc, _)| doc.clone()).collect())
            .unwrap_or_default()
    }
}

fn poisoned() -> RecipeRagError {
    RecipeRagError::Custom("In-memory index lock poisoned".to_string())
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn has_tagged(&self, dataset_tag: &str) -> Result<bool> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .iter()
            .any(|(doc, _)| doc.dataset_tag() == Some(dataset_tag)))
    }

    async fn count_tagged(&self, dataset_tag: &str) -> Result<usize> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .iter()
            .filter(|(doc, _)| doc.dataset_tag() == Some(dataset_tag))
            .count())
    }

    async fn add_documents(
        &self,
        documents: &[Document],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<()> {
        ensure_same_length(documents, &embeddings)?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.extend(documents.iter().cloned().zip(embeddings));
        Ok(())
    }

    async fn similarity_search(
        &self,
        embedding: &[f32],
        filter: &MetadataFilter,
        k: usize,
    ) -> Result<Vec<Document>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        let mut scored: Vec<(f32, &Document)> = entries
            .iter()
            .filter(|(doc, _)| filter.matches(doc))
            .map(|(doc, vector)| (cosine_similarity(embedding, vector), doc))
            .collect();

        // Stable sort keeps insertion order among ties
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn purge_tagged(&self, dataset_tag: &str) -> Result<u64> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|(doc, _)| doc.dataset_tag() != Some(dataset_tag));
        Ok((before - entries.len()) as u64)
    }
}
