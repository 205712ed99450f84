//! Logging configuration for the recipe service

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::Result;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "recipe-rag.log";

/// Initialize logging with configuration
pub fn init_logging_with_config(config: &crate::config::AppConfig) -> Result<()> {
    init_logging_with_level(&config.logging.level)
}

/// Initialize logging with a custom log level, writing to stderr and a daily log file
pub fn init_logging_with_level(level: &str) -> Result<()> {
    // Create logs directory if it doesn't exist
    let logs_dir = Path::new(LOG_DIR);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    // RUST_LOG wins over the configured level when present
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},recipe_rag={level}")));

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::RecipeRagError::Custom(format!("Failed to install logger: {e}")))?;

    tracing::info!("Logging initialized with level: {}", level);
    tracing::info!("Log files will be saved to: {}/{}.YYYY-MM-DD", LOG_DIR, LOG_FILE);

    // The writer thread must outlive every span; the process owns it until exit
    std::mem::forget(guard);

    Ok(())
}

/// Initialize simple console logging for tests and one-shot commands
pub fn init_simple_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .map_err(|e| crate::RecipeRagError::Custom(format!("Failed to install logger: {e}")))?;

    tracing::info!("Simple logging initialized");
    Ok(())
}
