use clap::Parser;
use recipe_rag::cli::handle_ask_command;
use recipe_rag::cli::handle_config_command;
use recipe_rag::cli::handle_index_command;
use recipe_rag::cli::handle_purge_command;
use recipe_rag::cli::handle_resume_command;
use recipe_rag::cli::handle_serve_api;
use recipe_rag::cli::handle_status_command;
use recipe_rag::cli::Cli;
use recipe_rag::cli::Commands;
use recipe_rag::config::AppConfig;
use recipe_rag::Result;
use tracing::error;
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    // Printing the config needs no log files
    if matches!(cli.command, Commands::Config) {
        recipe_rag::logging::init_simple_logging()?;
        return handle_config_command(&config);
    }

    // Initialize logging
    if cli.verbose {
        recipe_rag::logging::init_logging_with_level("debug")?;
    } else {
        recipe_rag::logging::init_logging_with_config(&config)?;
    }
    info!("Configuration loaded successfully");

    // Missing credentials are fatal for everything that talks to a provider
    config.validate()?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => handle_serve_api(&config, host, port, no_cors).await,
        Commands::Index { source } => handle_index_command(&config, source).await,
        Commands::Resume { source } => handle_resume_command(&config, source).await,
        Commands::Purge { force } => handle_purge_command(&config, force).await,
        Commands::Status { source, index_only } => {
            handle_status_command(&config, source, index_only).await
        }
        Commands::Ask { k } => handle_ask_command(&config, k).await,
        Commands::Config => handle_config_command(&config),
    }
}
