use async_trait::async_trait;
use pgvector::Vector;
use serde_json::Map;
use serde_json::Value;
use sqlx::types::Json;
use tracing::debug;

use super::ensure_same_length;
use super::Database;
use super::VectorIndex;
use crate::models::Document;
use crate::models::MetadataFilter;
use crate::models::DATASET_TAG_KEY;
use crate::Result;

#[async_trait]
impl VectorIndex for Database {
    async fn has_tagged(&self, dataset_tag: &str) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE metadata->>'{DATASET_TAG_KEY}' = $1)",
            self.table
        );
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(dataset_tag)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn count_tagged(&self, dataset_tag: &str) -> Result<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE metadata->>'{DATASET_TAG_KEY}' = $1",
            self.table
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(dataset_tag)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn add_documents(
        &self,
        documents: &[Document],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<()> {
        ensure_same_length(documents, &embeddings)?;

        let sql = format!(
            "INSERT INTO {} (content, metadata, embedding) VALUES ($1, $2, $3)",
            self.table
        );

        let mut tx = self.pool.begin().await?;
        for (document, embedding) in documents.iter().zip(embeddings) {
            sqlx::query(&sql)
                .bind(&document.content)
                .bind(Json(&document.metadata))
                .bind(Vector::from(embedding))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        debug!("Inserted {} documents into {}", documents.len(), self.table);
        Ok(())
    }

    async fn similarity_search(
        &self,
        embedding: &[f32],
        filter: &MetadataFilter,
        k: usize,
    ) -> Result<Vec<Document>> {
        let sql = format!(
            r"
            SELECT content, metadata
            FROM {}
            WHERE metadata->>'{DATASET_TAG_KEY}' = $1
            ORDER BY embedding <=> $2
            LIMIT $3
            ",
            self.table
        );

        let rows = sqlx::query_as::<_, (String, Json<Map<String, Value>>)>(&sql)
            .bind(&filter.dataset_tag)
            .bind(Vector::from(embedding.to_vec()))
            .bind(k as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(content, Json(metadata))| Document { content, metadata })
            .collect())
    }

    async fn purge_tagged(&self, dataset_tag: &str) -> Result<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE metadata->>'{DATASET_TAG_KEY}' = $1",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(dataset_tag)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
