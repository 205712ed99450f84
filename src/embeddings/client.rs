//! Embedding API clients for various providers

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Embedder;
use super::EmbeddingProvider;
use crate::errors::RecipeRagError;
use crate::errors::Result;

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| RecipeRagError::HttpError(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    /// Create a client from the `[embeddings]` section of the app config
    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        let embeddings = &config.embeddings;
        Self::new(
            embeddings.provider,
            embeddings.model.clone(),
            embeddings.endpoint.clone(),
            Some(embeddings.api_key.clone()),
        )
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            RecipeRagError::ConfigError(format!("{:?} API key not provided", self.provider))
        })
    }

    /// Generate embeddings using the Cohere embed API
    async fn generate_cohere(&self, texts: &[String], input_type: &str) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct CohereRequest<'a> {
            texts: &'a [String],
            model: &'a str,
            input_type: &'a str,
            truncate: &'a str,
        }

        #[derive(Deserialize)]
        struct CohereResponse {
            embeddings: Vec<Vec<f32>>,
        }

        let url = format!("{}/v1/embed", self.endpoint);
        debug!("Calling Cohere embed API: {} items ({})", texts.len(), input_type);

        let request = CohereRequest {
            texts,
            model: &self.model,
            input_type,
            truncate: "END",
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecipeRagError::EmbeddingError(format!(
                "Cohere API error ({status}): {error_text}"
            )));
        }

        let result: CohereResponse = response
            .json()
            .await
            .map_err(|e| RecipeRagError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        Ok(result.embeddings)
    }

    /// Generate embeddings using an `OpenAI`-compatible API
    async fn generate_openai(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: &'a [String],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI embeddings API: {} items", texts.len());

        let request = OpenAIRequest {
            input: texts,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecipeRagError::EmbeddingError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let mut result: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| RecipeRagError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        // The API does not promise response order
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecipeRagError::EmbeddingError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| RecipeRagError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        Ok(result.embedding)
    }

    async fn generate_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self.provider {
            EmbeddingProvider::Cohere => self.generate_cohere(texts, "search_document").await,
            EmbeddingProvider::OpenAI => self.generate_openai(texts).await,
            EmbeddingProvider::Ollama => {
                let mut embeddings = Vec::with_capacity(texts.len());
                for text in texts {
                    embeddings.push(self.generate_ollama(text).await?);
                }
                Ok(embeddings)
            }
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = match self.provider {
            EmbeddingProvider::Cohere => {
                self.generate_cohere(&[text.to_string()], "search_query")
                    .await?
            }
            EmbeddingProvider::OpenAI => self.generate_openai(&[text.to_string()]).await?,
            EmbeddingProvider::Ollama => return self.generate_ollama(text).await,
        };

        embeddings
            .pop()
            .ok_or_else(|| RecipeRagError::EmbeddingError("No embedding in response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.len() > self.max_batch_size() {
            return Err(RecipeRagError::EmbeddingError(format!(
                "Batch of {} exceeds the {:?} limit of {}",
                texts.len(),
                self.provider,
                self.max_batch_size()
            )));
        }

        let embeddings = self.generate_documents(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(RecipeRagError::EmbeddingError(format!(
                "Provider returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }

        Ok(embeddings)
    }

    fn max_batch_size(&self) -> usize {
        self.provider.max_batch_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Cohere,
            "embed-english-v3.0".to_string(),
            "https://api.cohere.com/".to_string(),
            Some("   ".to_string()),
        )
        .unwrap();

        assert!(matches!(client.api_key(), Err(RecipeRagError::ConfigError(_))));
        assert_eq!(client.endpoint, "https://api.cohere.com");
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_before_any_request() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Cohere,
            "embed-english-v3.0".to_string(),
            "http://127.0.0.1:9".to_string(),
            Some("key".to_string()),
        )
        .unwrap();

        let texts = vec!["row".to_string(); crate::embeddings::COHERE_MAX_BATCH_SIZE + 1];
        let err = client.embed_batch(&texts).await.unwrap_err();
        assert!(matches!(err, RecipeRagError::EmbeddingError(_)));
    }

    #[tokio::test]
    #[ignore = "Requires COHERE_API_KEY"]
    async fn test_cohere_embedding() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Cohere,
            "embed-english-v3.0".to_string(),
            "https://api.cohere.com".to_string(),
            std::env::var("COHERE_API_KEY").ok(),
        )
        .unwrap();

        let embedding = client.embed("chicken curry").await.unwrap();
        assert_eq!(embedding.len(), 1024);
    }
}
