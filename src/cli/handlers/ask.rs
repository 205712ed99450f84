//! Terminal cooking chat

use std::io;
use std::sync::Arc;
use std::time::Instant;

use super::connect_index;
use super::embedder;
use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::cli::output::print_prompt;
use crate::cli::output::print_success;
use crate::llm::LlmService;
use crate::rag::CookingChat;
use crate::rag::HistoryWindow;
use crate::rag::RequestContext;
use crate::rag::Retriever;
use crate::AppConfig;
use crate::Result;

/// Read questions from stdin until `exit`; failed turns are reported and skipped
pub async fn handle_ask_command(config: &AppConfig, k: Option<usize>) -> Result<()> {
    let retriever = Retriever::new(embedder(config)?, connect_index(config).await?);
    let llm = Arc::new(LlmService::new(config)?);
    let mut chat = CookingChat::new(
        llm,
        retriever,
        config.dataset_tag(),
        k.unwrap_or(config.retrieval.demo_k),
        HistoryWindow::from(&config.history),
    );

    println!("\n----------------------------------------");
    println!("Chat with the recipe corpus ({})", config.dataset_tag());
    println!("Type 'exit' to quit.");
    println!("----------------------------------------");

    loop {
        print_prompt("You: ");

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let question = input.trim();

        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        print_info("...Bot is thinking...");
        let started = Instant::now();
        match chat.ask(question, &RequestContext::unbounded()).await {
            Ok(answer) => {
                println!("\nBot: {answer}");
                println!(
                    "\n(Query took {:.2}s)",
                    started.elapsed().as_secs_f64()
                );
            }
            Err(e) => {
                print_error(&format!("An error occurred during query: {e}"));
                println!("Please try another question.");
            }
        }
    }

    println!();
    print_success("👋 Conversation ended. Goodbye!");
    Ok(())
}
