//! Language model access
//!
//! Every pipeline stage talks to the model through [`Completion`], one
//! request in and one text out. [`LlmService`] is the hosted implementation.

pub mod client;

use async_trait::async_trait;
pub use client::LlmService;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;

/// Supported chat model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini `generateContent`
    Gemini,
    /// `OpenAI` `chat/completions` and compatible servers
    #[serde(alias = "openai")]
    OpenAI,
    /// Ollama `/api/chat`
    Ollama,
}

impl LlmProvider {
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

/// A system instruction plus one human message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub human: String,
}

impl ChatPrompt {
    pub fn new(system: impl Into<String>, human: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            human: human.into(),
        }
    }
}

/// Capability to complete a prompt into text
#[async_trait]
pub trait Completion: Send + Sync {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String>;
}
