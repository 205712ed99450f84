//! Tag-filtered similarity retrieval

use std::sync::Arc;

use tracing::debug;

use crate::database::VectorIndex;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::models::Document;
use crate::models::MetadataFilter;

/// Separator line placed above every retrieved document in the prompt context
pub const DOCUMENT_HEADER: &str = "--- Recipe ---";

/// Render documents as `--- Recipe ---` blocks separated by blank lines
#[must_use]
pub fn format_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| format!("{DOCUMENT_HEADER}\n{}", doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Embeds a question and fetches the nearest documents of one dataset
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Top-`k` documents tagged `dataset_tag`, as ranked by the index.
    ///
    /// No similarity cutoff is applied; callers get `k` documents whenever the
    /// dataset holds that many, relevant or not.
    pub async fn search(&self, question: &str, dataset_tag: &str, k: usize) -> Result<Vec<Document>> {
        debug!("Retrieving top {} documents for: {}", k, question);

        let embedding = self.embedder.embed(question).await?;
        let documents = self
            .index
            .similarity_search(&embedding, &MetadataFilter::dataset(dataset_tag), k)
            .await?;

        debug!("Retrieved {} documents", documents.len());
        Ok(documents)
    }

    /// [`Self::search`] rendered as prompt context
    pub async fn retrieve(&self, question: &str, dataset_tag: &str, k: usize) -> Result<String> {
        let documents = self.search(question, dataset_tag, k).await?;
        Ok(format_documents(&documents))
    }
}
