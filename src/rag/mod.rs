//! RAG (Retrieval-Augmented Generation) module
//!
//! Turns a chat turn into a structured recipe:
//! - Condense the follow-up and history into a standalone question
//! - Retrieve the nearest recipes of the configured dataset
//! - Compose a JSON recipe honouring the user's constraints
//! - Parse and validate the model output
//!
//! Meal plans skip retrieval and go straight to the model.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use recipe_rag::config::AppConfig;
//! use recipe_rag::database::InMemoryIndex;
//! use recipe_rag::embeddings::EmbeddingClient;
//! use recipe_rag::llm::LlmService;
//! use recipe_rag::rag::{RecipeQuery, RecipeQueryService, RequestContext, Retriever};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let retriever = Retriever::new(
//!         Arc::new(EmbeddingClient::from_app_config(&config)?),
//!         Arc::new(InMemoryIndex::new()),
//!     );
//!     let service =
//!         RecipeQueryService::from_config(&config, Arc::new(LlmService::new(&config)?), retriever);
//!
//!     let query = RecipeQuery {
//!         question: "high protein dinner under 500 calories".to_string(),
//!         ..RecipeQuery::default()
//!     };
//!     let recipe = service.query(&query, &RequestContext::unbounded()).await?;
//!     println!("{}: {}", recipe.title, recipe.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod constraints;
pub mod context;
pub mod history;
pub mod meal_plan;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod retriever;

pub use chat::CookingChat;
pub use constraints::map_constraints;
pub use constraints::Preferences;
pub use context::RequestContext;
pub use history::HistoryWindow;
pub use meal_plan::MealPlanService;
pub use parser::ParseFailure;
pub use pipeline::RecipeQuery;
pub use pipeline::RecipeQueryService;
pub use retriever::Retriever;
