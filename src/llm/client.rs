//! Hosted chat model client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use serde_json::Value;
use tracing::debug;

use super::ChatPrompt;
use super::Completion;
use super::LlmProvider;
use crate::config::AppConfig;
use crate::errors::RecipeRagError;
use crate::errors::Result;

/// Chat model client covering Gemini, OpenAI-compatible servers and Ollama
#[derive(Clone)]
pub struct LlmService {
    provider: LlmProvider,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: Client,
}

impl LlmService {
    /// Create a new LLM service from the `[llm]` config section
    ///
    /// # Errors
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        let llm = &config.llm;
        // Upper bound only; request deadlines are enforced by the pipeline
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .map_err(|e| RecipeRagError::HttpError(e.to_string()))?;

        Ok(Self {
            provider: llm.provider,
            endpoint: llm.endpoint.trim_end_matches('/').to_string(),
            api_key: llm.api_key.clone(),
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            client,
        })
    }

    fn request_url(&self) -> String {
        match self.provider {
            LlmProvider::Gemini => format!(
                "{}/v1beta/models/{}:generateContent",
                self.endpoint, self.model
            ),
            LlmProvider::OpenAI => format!("{}/chat/completions", self.endpoint),
            LlmProvider::Ollama => format!("{}/api/chat", self.endpoint),
        }
    }

    fn request_payload(&self, prompt: &ChatPrompt) -> Value {
        match self.provider {
            LlmProvider::Gemini => json!({
                "systemInstruction": { "parts": [{ "text": prompt.system }] },
                "contents": [{ "role": "user", "parts": [{ "text": prompt.human }] }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens,
                },
            }),
            LlmProvider::OpenAI => json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": prompt.system },
                    { "role": "user", "content": prompt.human },
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
            }),
            LlmProvider::Ollama => json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": prompt.system },
                    { "role": "user", "content": prompt.human },
                ],
                "stream": false,
                "options": { "temperature": self.temperature },
            }),
        }
    }

    /// Pull the generated text out of a provider response body
    fn extract_text(&self, body: &Value) -> Option<String> {
        let text = match self.provider {
            LlmProvider::Gemini => body["candidates"][0]["content"]["parts"]
                .as_array()
                .map(|parts| {
                    parts
                        .iter()
                        .filter_map(|part| part["text"].as_str())
                        .collect::<String>()
                }),
            LlmProvider::OpenAI => body["choices"][0]["message"]["content"]
                .as_str()
                .map(str::to_string),
            LlmProvider::Ollama => body["message"]["content"].as_str().map(str::to_string),
        };

        text.filter(|t| !t.trim().is_empty())
    }
}

#[async_trait]
impl Completion for LlmService {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String> {
        let url = self.request_url();
        debug!(
            "Calling {:?} model {} ({} system chars, {} human chars)",
            self.provider,
            self.model,
            prompt.system.len(),
            prompt.human.len()
        );

        let mut request = self.client.post(&url).json(&self.request_payload(prompt));
        request = match self.provider {
            LlmProvider::Gemini => request.header("x-goog-api-key", &self.api_key),
            LlmProvider::OpenAI => request.bearer_auth(&self.api_key),
            LlmProvider::Ollama => request,
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecipeRagError::LlmError(format!(
                "{:?} API error ({status}): {error_text}",
                self.provider
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RecipeRagError::LlmError(format!("Failed to parse response: {e}")))?;

        self.extract_text(&body).ok_or_else(|| {
            RecipeRagError::LlmError(format!("{:?} returned an empty completion", self.provider))
        })
    }
}
