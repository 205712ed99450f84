//! Provider doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use recipe_rag::api::AppState;
use recipe_rag::api::ReadinessGate;
use recipe_rag::config::ServerConfig;
use recipe_rag::database::InMemoryIndex;
use recipe_rag::database::VectorIndex;
use recipe_rag::embeddings::Embedder;
use recipe_rag::llm::ChatPrompt;
use recipe_rag::llm::Completion;
use recipe_rag::models::Document;
use recipe_rag::rag::HistoryWindow;
use recipe_rag::rag::MealPlanService;
use recipe_rag::rag::RecipeQueryService;
use recipe_rag::rag::Retriever;
use recipe_rag::RecipeRagError;
use recipe_rag::Result;

pub const TAG: &str = "recipes-v1";

pub const RECIPE_JSON: &str = r#"{"title":"Chickpea Curry","summary":"Creamy vegan curry","ingredients":["1 can chickpeas","1 can coconut milk"],"steps":["Simmer chickpeas in coconut milk.","Season and serve."],"macros":{"calories":520,"protein":18,"carbs":60,"fats":22},"time":30,"difficulty":"easy","servings":2,"explanation":"Vegan and ready in 30 minutes"}"#;

/// Letter-histogram embeddings, stable across runs
pub struct LetterEmbedder;

pub fn letter_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0; 8];
    for b in text.to_lowercase().bytes().filter(u8::is_ascii_alphabetic) {
        v[(b - b'a') as usize % 8] += 1.0;
    }
    v
}

#[async_trait]
impl Embedder for LetterEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(letter_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| letter_vector(t)).collect())
    }

    fn max_batch_size(&self) -> usize {
        96
    }
}

/// Completion answering from a queue and recording prompts
#[derive(Default)]
pub struct QueuedLlm {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<ChatPrompt>>,
}

impl QueuedLlm {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| (*r).to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for QueuedLlm {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RecipeRagError::LlmError("queue exhausted".to_string()))
    }
}

pub async fn seeded_index() -> Arc<InMemoryIndex> {
    let index = Arc::new(InMemoryIndex::new());
    let docs: Vec<Document> = [
        "name: chickpea curry\ntags: vegan",
        "name: lentil soup\ntags: vegan",
        "name: beef stew\ntags: dinner",
    ]
    .iter()
    .map(|c| Document::new(*c).tagged(TAG))
    .collect();
    let embeddings = docs.iter().map(|d| letter_vector(&d.content)).collect();
    index.add_documents(&docs, embeddings).await.unwrap();
    index
}

/// Application state over in-memory providers
pub async fn app_state(llm: Arc<QueuedLlm>, readiness: ReadinessGate) -> AppState {
    let retriever = Retriever::new(Arc::new(LetterEmbedder), seeded_index().await);
    let recipes = RecipeQueryService::new(llm.clone(), retriever, TAG, 3, HistoryWindow::default());
    AppState::new(
        readiness,
        recipes,
        MealPlanService::new(llm),
        &ServerConfig::default(),
    )
}

pub fn ready_gate() -> ReadinessGate {
    let gate = ReadinessGate::new();
    gate.begin_loading();
    gate.mark_ready();
    gate
}
