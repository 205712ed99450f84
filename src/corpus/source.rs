//! Tabular corpus sources

use std::path::Path;
use std::path::PathBuf;

use csv::ReaderBuilder;
use serde_json::Value;
use tracing::info;

use super::Document;
use crate::RecipeRagError;
use crate::Result;

/// Anything that can produce the corpus rows in a stable order
pub trait CorpusSource: Send + Sync {
    /// Human-readable location for logs
    fn describe(&self) -> String;

    /// Load every row as an untagged document
    fn load(&self) -> Result<Vec<Document>>;
}

/// Rows already held in memory
impl CorpusSource for Vec<Document> {
    fn describe(&self) -> String {
        format!("{} in-memory rows", self.len())
    }

    fn load(&self) -> Result<Vec<Document>> {
        Ok(self.clone())
    }
}

/// CSV file with a header row; each record becomes one document
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Flatten a record into `"header: value"` lines
fn render_row(headers: &csv::StringRecord, record: &csv::StringRecord) -> String {
    headers
        .iter()
        .zip(record.iter())
        .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CorpusSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Document>> {
        if !self.path.exists() {
            return Err(RecipeRagError::CorpusError(format!(
                "CSV file not found at: {}",
                self.path.display()
            )));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let source = self.path.display().to_string();

        let mut documents = Vec::new();
        for (row_index, record) in reader.records().enumerate() {
            let record = record?;
            let mut document = Document::new(render_row(&headers, &record));
            document
                .metadata
                .insert("source".to_string(), Value::String(source.clone()));
            document
                .metadata
                .insert("line".to_string(), Value::from(row_index + 1));
            documents.push(document);
        }

        if documents.is_empty() {
            return Err(RecipeRagError::CorpusError(format!(
                "No rows found in {}",
                self.path.display()
            )));
        }

        info!("Loaded {} rows from {}", documents.len(), source);
        Ok(documents)
    }
}
