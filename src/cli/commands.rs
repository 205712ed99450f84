//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "recipe-rag")]
#[command(about = "Conversational recipe RAG service: corpus loading, API server and terminal chat")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: config level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server; indexes the corpus first if needed
    Serve {
        /// Host to bind to (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS even if enabled in config
        #[arg(long)]
        no_cors: bool,
    },
    /// Index the corpus unless the dataset tag is already present
    Index {
        /// CSV file to load (default: corpus.source_path)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// Continue a partial load from the number of documents already stored
    Resume {
        /// CSV file to load (default: corpus.source_path)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// Delete every document carrying the dataset tag
    Purge {
        /// Required to actually delete
        #[arg(short, long)]
        force: bool,
    },
    /// Show how many documents are indexed for the dataset tag
    Status {
        /// Also count rows in this CSV file (default: corpus.source_path)
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Skip reading the source file
        #[arg(long)]
        index_only: bool,
    },
    /// Chat with the recipe corpus in the terminal
    Ask {
        /// Documents retrieved per question (default: retrieval.demo_k)
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Show current configuration
    Config,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_purge_requires_force_to_delete() {
        let cli = Cli::command();
        let purge = cli.find_subcommand("purge").unwrap();
        let force = purge
            .get_arguments()
            .find(|arg| arg.get_id() == "force")
            .unwrap();
        assert_eq!(
            force.get_help().unwrap().to_string(),
            "Required to actually delete"
        );

        let parsed = Cli::try_parse_from(["recipe-rag", "purge"]).unwrap();
        assert!(matches!(parsed.command, Commands::Purge { force: false }));
    }
}
