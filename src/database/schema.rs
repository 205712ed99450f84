use tracing::info;

use super::Database;
use crate::Result;

impl Database {
    /// Create the pgvector extension, the documents table and its indexes.
    ///
    /// Safe to run on every start.
    pub async fn init_schema(&self) -> Result<()> {
        info!("Ensuring schema for table {}", self.table);

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        let create_table = format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL PRIMARY KEY,
                content TEXT NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                embedding VECTOR({dimension}) NOT NULL
            )
            ",
            table = self.table,
            dimension = self.dimension
        );
        sqlx::query(&create_table).execute(&self.pool).await?;

        // Every read and count filters on the tag
        let tag_index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_dataset_tag_idx ON {table} ((metadata->>'dataset_tag'))",
            table = self.table
        );
        sqlx::query(&tag_index).execute(&self.pool).await?;

        let vector_index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_embedding_idx ON {table} USING hnsw (embedding vector_cosine_ops)",
            table = self.table
        );
        sqlx::query(&vector_index).execute(&self.pool).await?;

        Ok(())
    }
}
