//! Free-text cooking chat with in-memory history, used by the terminal REPL

use std::sync::Arc;

use super::context::RequestContext;
use super::history::HistoryWindow;
use super::pipeline::condense_question;
use super::prompts;
use super::retriever::Retriever;
use crate::errors::Result;
use crate::llm::Completion;
use crate::models::ChatTurn;

pub struct CookingChat {
    llm: Arc<dyn Completion>,
    retriever: Retriever,
    dataset_tag: String,
    k: usize,
    window: HistoryWindow,
    history: Vec<ChatTurn>,
}

impl CookingChat {
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
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Answer one turn. History only grows when the turn succeeds.
    pub async fn ask(&mut self, question: &str, ctx: &RequestContext) -> Result<String> {
        let chat_history = self.window.render(&self.history);
        let standalone =
            condense_question(self.llm.as_ref(), question, &chat_history, ctx).await?;
        let context = ctx
            .run(
                "retrieve",
                self.retriever.retrieve(&standalone, &self.dataset_tag, self.k),
            )
            .await?;

        let prompt = prompts::cooking_prompt(question, &context, &chat_history);
        let answer = ctx.run("answer", self.llm.generate(&prompt)).await?;

        self.history.push(ChatTurn::human(question));
        self.history.push(ChatTurn::ai(answer.clone()));
        Ok(answer)
    }
}
