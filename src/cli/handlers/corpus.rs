//! Corpus maintenance handlers

use std::path::PathBuf;

use super::corpus_loader;
use super::csv_source;
use crate::cli::output::print_info;
use crate::cli::output::print_load_stats;
use crate::cli::output::print_status;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::corpus::CorpusSource;
use crate::corpus::LoadOutcome;
use crate::AppConfig;
use crate::Result;

/// Load the corpus unless the dataset tag already has documents
pub async fn handle_index_command(config: &AppConfig, source: Option<PathBuf>) -> Result<()> {
    let loader = corpus_loader(config).await?;
    let source = csv_source(config, source);

    print_info(&format!(
        "📚 Indexing {} as {}",
        source.describe(),
        loader.dataset_tag()
    ));

    match loader.ensure_indexed(&source).await? {
        LoadOutcome::AlreadyIndexed => {
            print_success(&format!(
                "Documents tagged {} already present, nothing to do",
                loader.dataset_tag()
            ));
            print_info("Use `recipe-rag status` to compare with the source, `resume` to finish a partial load");
        }
        LoadOutcome::Indexed(stats) => {
            print_load_stats(&stats);
            print_success("Corpus indexed");
        }
    }
    Ok(())
}

/// Embed only the rows past the stored count
pub async fn handle_resume_command(config: &AppConfig, source: Option<PathBuf>) -> Result<()> {
    let loader = corpus_loader(config).await?;
    let source = csv_source(config, source);

    print_info(&format!(
        "🔁 Resuming {} from {}",
        loader.dataset_tag(),
        source.describe()
    ));

    let stats = loader.resume(&source).await?;
    print_load_stats(&stats);
    if stats.embedded == 0 {
        print_success("Nothing left to embed");
    } else {
        print_success("Resume complete");
    }
    Ok(())
}

pub async fn handle_purge_command(config: &AppConfig, force: bool) -> Result<()> {
    if !force {
        print_warning(&format!(
            "This will delete every document tagged {}.",
            config.dataset_tag()
        ));
        println!("\nUse --force to proceed.");
        return Ok(());
    }

    let loader = corpus_loader(config).await?;
    let removed = loader.purge().await?;
    print_success(&format!(
        "Deleted {removed} documents tagged {}",
        loader.dataset_tag()
    ));
    Ok(())
}

pub async fn handle_status_command(
    config: &AppConfig,
    source: Option<PathBuf>,
    index_only: bool,
) -> Result<()> {
    let loader = corpus_loader(config).await?;
    let status = if index_only {
        loader.status(None).await?
    } else {
        let source = csv_source(config, source);
        loader.status(Some(&source as &dyn CorpusSource)).await?
    };
    print_status(&status);
    Ok(())
}
