//! Conversational recipe query: Condense -> Retrieve -> Compose -> Parse

use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use super::context::RequestContext;
use super::history::HistoryWindow;
use super::parser::parse_recipe;
use super::prompts;
use super::retriever::Retriever;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::llm::Completion;
use crate::models::ChatTurn;
use crate::models::ConstraintSet;
use crate::models::Recipe;
use crate::RecipeRagError;

/// One recipe request after normalization
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub question: String,
    pub history: Vec<ChatTurn>,
    pub constraints: ConstraintSet,
}

/// Rewrite `question` as a standalone question given the rendered history
pub(crate) async fn condense_question(
    llm: &dyn Completion,
    question: &str,
    chat_history: &str,
    ctx: &RequestContext,
) -> Result<String> {
    let prompt = prompts::condense_prompt(question, chat_history);
    let standalone = ctx.run("condense", llm.generate(&prompt)).await?;
    let standalone = standalone.trim().to_string();
    debug!("Standalone question: {}", standalone);
    Ok(standalone)
}

/// Recipe query service shared by all HTTP requests
#[derive(Clone)]
pub struct RecipeQueryService {
    llm: Arc<dyn Completion>,
    retriever: Retriever,
    dataset_tag: String,
    k: usize,
    window: HistoryWindow,
}

impl RecipeQueryService {
    pub fn new(
        llm: Arc<dyn Completion>,
        retriever: Retriever,
        dataset_tag: impl Into<String>,
        k: usize,
        window: HistoryWindow,
    ) -> Self {
        Self {
            llm,
            retriever,
            dataset_tag: dataset_tag.into(),
            k,
            window,
        }
    }

    /// Build with the configured tag, `retrieval.recipe_k` and history window
    pub fn from_config(config: &AppConfig, llm: Arc<dyn Completion>, retriever: Retriever) -> Self {
        Self::new(
            llm,
            retriever,
            config.dataset_tag(),
            config.retrieval.recipe_k,
            HistoryWindow::from(&config.history),
        )
    }

    pub async fn condense(
        &self,
        question: &str,
        chat_history: &str,
        ctx: &RequestContext,
    ) -> Result<String> {
        condense_question(self.llm.as_ref(), question, chat_history, ctx).await
    }

    pub async fn retrieve(&self, standalone_question: &str, ctx: &RequestContext) -> Result<String> {
        ctx.run(
            "retrieve",
            self.retriever
                .retrieve(standalone_question, &self.dataset_tag, self.k),
        )
        .await
    }

    /// One model call producing the raw recipe answer
    pub async fn compose_recipe(
        &self,
        question: &str,
        context: &str,
        chat_history: &str,
        constraints: &ConstraintSet,
        ctx: &RequestContext,
    ) -> Result<String> {
        let prompt = prompts::recipe_prompt(question, context, chat_history, constraints);
        ctx.run("compose", self.llm.generate(&prompt)).await
    }

    /// Run the full chain.
    ///
    /// Stages run strictly in order; any stage failure fails the request and no
    /// partial recipe is ever returned. The original question, not the condensed
    /// one, is what the answer prompt sees.
    pub async fn query(&self, query: &RecipeQuery, ctx: &RequestContext) -> Result<Recipe> {
        if query.question.trim().is_empty() {
            return Err(RecipeRagError::InvalidRequest(
                "Question is required".to_string(),
            ));
        }

        info!("Processing recipe query: {}", query.question);
        let chat_history = self.window.render(&query.history);

        debug!("Step 1: Condensing question");
        let standalone = self.condense(&query.question, &chat_history, ctx).await?;

        debug!("Step 2: Retrieving documents");
        let context = self.retrieve(&standalone, ctx).await?;

        debug!("Step 3: Composing recipe");
        let raw = self
            .compose_recipe(
                &query.question,
                &context,
                &chat_history,
                &query.constraints,
                ctx,
            )
            .await?;

        match parse_recipe(&raw) {
            Ok(recipe) => {
                info!("Recipe query completed: {}", recipe.title);
                Ok(recipe)
            }
            Err(failure) => {
                error!("Error parsing recipe JSON: {}", failure.kind);
                error!("Raw LLM response: {}", failure.raw);
                Err(failure.into())
            }
        }
    }
}
