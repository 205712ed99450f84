//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `recipe-rag` CLI

use crate::corpus::LoadStats;
use crate::corpus::LoadStatus;
use crate::AppConfig;

pub fn print_load_stats(stats: &LoadStats) {
    println!("📦 Load summary:");
    println!("  Source rows:   {}", stats.total_rows);
    println!("  Start offset:  {}", stats.start_offset);
    println!("  Embedded:      {}", stats.embedded);
    println!("  Batches:       {}", stats.batches);
}

pub fn print_status(status: &LoadStatus) {
    println!("📊 Dataset {}:", status.dataset_tag);
    println!("  Indexed documents: {}", status.indexed);
    if let Some(rows) = status.source_rows {
        println!("  Source rows:       {rows}");
    }
    match status.complete() {
        Some(true) => print_success("Corpus fully indexed"),
        Some(false) => print_warning(&format!(
            "{} rows not yet indexed; run `recipe-rag resume` to finish",
            status.remaining().unwrap_or_default()
        )),
        None => {}
    }
}

pub fn print_config(config: &AppConfig) {
    println!("📋 recipe-rag Configuration:");
    println!();

    println!("🗄️  Database:");
    println!("  URL: {}", mask_database_url(config.database_url()));
    println!("  Table: {}", config.database.table_name);
    println!("  Max connections: {}", config.max_connections());
    println!("  Min connections: {}", config.min_connections());
    println!("  Connection timeout: {}s", config.connection_timeout());
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {:?}", config.embeddings.provider);
    println!("  Model: {}", config.embeddings.model);
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  Key: {}", mask_key(&config.embeddings.api_key));
    println!();

    println!("🤖 LLM:");
    println!("  Provider: {:?}", config.llm.provider);
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Model: {}", config.llm.model);
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Key: {}", mask_key(&config.llm.api_key));
    println!();

    println!("📚 Corpus:");
    println!("  Dataset tag: {}", config.dataset_tag());
    println!("  Source: {}", config.corpus.source_path);
    println!("  Batch size: {}", config.corpus.batch_size);
    println!("  Batch delay: {}ms", config.corpus.batch_delay_ms);
    println!();

    println!("🔎 Retrieval:");
    println!("  Recipe k: {}", config.retrieval.recipe_k);
    println!("  Chat k: {}", config.retrieval.demo_k);
    println!("  History turns: {}", config.history.max_turns);
    if let Some(max_chars) = config.history.max_chars {
        println!("  History chars: {max_chars}");
    }
    println!();

    println!("🌐 Server:");
    println!("  Bind: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.cors);
    println!("  Query timeout: {}s", config.server.query_timeout_secs);
    println!("  Meal plan timeout: {}s", config.server.meal_plan_timeout_secs);
    println!(
        "  Meal plan waits for corpus: {}",
        config.server.gate_meal_plan_on_corpus
    );
}

/// Mask database URL for logging (hide password and query parameters)
fn mask_database_url(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return "***invalid***".to_string();
    };
    let Some(host) = parsed.host_str() else {
        return "***masked***".to_string();
    };

    let credentials = match (parsed.username(), parsed.password()) {
        ("", _) => String::new(),
        (user, Some(_)) => format!("{user}:***@"),
        (user, None) => format!("{user}@"),
    };
    format!(
        "{}://{}{}:{}{}",
        parsed.scheme(),
        credentials,
        host,
        parsed.port().unwrap_or(5432),
        parsed.path()
    )
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        "(not set)".to_string()
    } else {
        format!("{}***", key.chars().take(4).collect::<String>())
    }
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}

pub fn print_prompt(msg: &str) {
    print!("{msg}");
    let _ = std::io::Write::flush(&mut std::io::stdout());
}
