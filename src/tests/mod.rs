//! Test doubles for the provider capabilities, plus cross-module tests


use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::embeddings::Embedder;
use crate::llm::ChatPrompt;
use crate::llm::Completion;
use crate::models::Document;
use crate::RecipeRagError;
use crate::Result;

pub const FAKE_DIMENSION: usize = 16;

/// Deterministic character-histogram embeddings; records every call
#[derive(Debug, Default)]
pub struct FakeEmbedder {
    pub query_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
    /// Every text passed to `embed`, in call order
    pub queries: Mutex<Vec<String>>,
    /// Every text passed to `embed_batch`, in call order
    pub embedded: Mutex<Vec<String>>,
    /// Fail the batch call with this zero-based index
    pub fail_on_batch: Option<usize>,
    pub max_batch: Option<usize>,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_batch(index: usize) -> Self {
        Self {
            fail_on_batch: Some(index),
            ..Self::default()
        }
    }

    pub fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; FAKE_DIMENSION];
        for b in text.to_lowercase().bytes().filter(u8::is_ascii_alphabetic) {
            v[(b - b'a') as usize % FAKE_DIMENSION] += 1.0;
        }
        v
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn embedded_texts(&self) -> Vec<String> {
        self.embedded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(text.to_string());
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_batch == Some(call) {
            return Err(RecipeRagError::EmbeddingError(
                "429 Too Many Requests".to_string(),
            ));
        }
        self.embedded.lock().unwrap().extend(texts.iter().cloned());
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch.unwrap_or(usize::MAX)
    }
}

/// Completion returning queued responses in order and recording every prompt
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<ChatPrompt>>,
}

impl ScriptedCompletion {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RecipeRagError::LlmError("no scripted response left".to_string()))
    }
}

/// Completion that always fails like an unauthorized provider
#[derive(Debug, Default)]
pub struct FailingCompletion {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Completion for FailingCompletion {
    async fn generate(&self, _prompt: &ChatPrompt) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RecipeRagError::LlmError(
            "Gemini API error (401 Unauthorized)".to_string(),
        ))
    }
}

/// `count` recipe rows named `recipe 0..count`
pub fn recipe_rows(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| Document::new(format!("name: recipe {i}\nminutes: {}", 10 + i)))
        .collect()
}

pub const RECIPE_JSON: &str = r#"{"title":"Lemon Chicken","summary":"Bright and quick","ingredients":["2 chicken breasts","1 lemon"],"steps":["Sear chicken until golden.","Finish with lemon."],"macros":{"calories":480,"protein":42,"carbs":12,"fats":18},"time":25,"difficulty":"easy","servings":2,"explanation":"High protein and under 500 kcal"}"#;
