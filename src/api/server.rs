//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use tracing::info;

use crate::api::routes;
use crate::api::state::AppState;
use crate::api::state::ReadinessGate;
use crate::config::AppConfig;
use crate::corpus::CorpusLoader;
use crate::corpus::CorpusSource;
use crate::corpus::CsvSource;
use crate::corpus::LoadOptions;
use crate::corpus::LoadOutcome;
use crate::database::Database;
use crate::database::VectorIndex;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::llm::Completion;
use crate::llm::LlmService;
use crate::rag::MealPlanService;
use crate::rag::RecipeQueryService;
use crate::rag::Retriever;
use crate::RecipeRagError;
use crate::Result;

/// Router with tracing, compression and optional permissive CORS
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = routes::api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Index the corpus if needed and open the readiness gate.
///
/// The gate moves to `Loading` before the check and to `Ready` only once the
/// corpus is present. On failure it stays at `Loading` so queries keep
/// answering 503.
pub async fn prepare_corpus(
    readiness: &ReadinessGate,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    dataset_tag: impl Into<String>,
    options: LoadOptions,
    source: &dyn CorpusSource,
) -> Result<LoadOutcome> {
    readiness.begin_loading();
    let loader = CorpusLoader::new(index, embedder, dataset_tag, options);

    let outcome = match loader.ensure_indexed(source).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to initialize RAG data: {}", e);
            return Err(e);
        }
    };
    match &outcome {
        LoadOutcome::AlreadyIndexed => info!("RAG data already indexed"),
        LoadOutcome::Indexed(stats) => {
            info!("RAG data initialized: {} documents indexed", stats.embedded);
        }
    }

    readiness.mark_ready();
    Ok(outcome)
}

/// Start the API server.
///
/// The listener accepts requests immediately; query endpoints answer 503 until
/// the corpus check finishes. A failed corpus load is returned as an error and
/// the caller is expected to exit.
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting recipe RAG API server...");

    // Initialize services
    let database = Database::from_config(config).await?;
    database.init_schema().await?;
    let index: Arc<dyn VectorIndex> = Arc::new(database);
    let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingClient::from_app_config(config)?);
    let llm: Arc<dyn Completion> = Arc::new(LlmService::new(config)?);

    let retriever = Retriever::new(embedder.clone(), index.clone());
    let readiness = ReadinessGate::new();
    let state = AppState::new(
        readiness.clone(),
        RecipeQueryService::from_config(config, llm.clone(), retriever),
        MealPlanService::new(llm),
        &config.server,
    );

    let app = build_app(state, enable_cors);

    // Start server
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health         - Health check");
    info!("  POST /api/query      - Conversational recipe query");
    info!("  POST /api/meal-plan  - Meal plan from ingredients");

    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let source = CsvSource::new(&config.corpus.source_path);
    let prepared = prepare_corpus(
        &readiness,
        index,
        embedder,
        config.dataset_tag(),
        LoadOptions::from_config(config),
        &source,
    )
    .await;
    if let Err(e) = prepared {
        server.abort();
        return Err(e);
    }

    server
        .await
        .map_err(|e| RecipeRagError::Custom(format!("API server task failed: {e}")))??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::state::ServiceState;
    use crate::database::InMemoryIndex;
    use crate::tests::recipe_rows;
    use crate::tests::FakeEmbedder;

    const TAG: &str = "recipes-v1";

    fn options(batch_size: usize) -> LoadOptions {
        LoadOptions {
            batch_size,
            batch_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_gate_opens_after_fresh_load() {
        let gate = ReadinessGate::new();
        let index = Arc::new(InMemoryIndex::new());
        let rows = recipe_rows(7);

        let outcome = prepare_corpus(
            &gate,
            index.clone(),
            Arc::new(FakeEmbedder::new()),
            TAG,
            options(3),
            &rows,
        )
        .await
        .unwrap();

        assert!(outcome.loaded());
        assert_eq!(gate.state(), ServiceState::Ready);
        assert_eq!(index.count_tagged(TAG).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_gate_opens_when_corpus_already_indexed() {
        let gate = ReadinessGate::new();
        let index = Arc::new(InMemoryIndex::new());
        let rows = recipe_rows(4);
        CorpusLoader::new(index.clone(), Arc::new(FakeEmbedder::new()), TAG, options(4))
            .ensure_indexed(&rows)
            .await
            .unwrap();

        let embedder = Arc::new(FakeEmbedder::new());
        let outcome = prepare_corpus(&gate, index, embedder.clone(), TAG, options(4), &rows)
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::AlreadyIndexed);
        assert_eq!(embedder.batch_calls(), 0);
        assert!(gate.is_ready());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_gate_loading() {
        let gate = ReadinessGate::new();
        let index = Arc::new(InMemoryIndex::new());

        let result = prepare_corpus(
            &gate,
            index.clone(),
            Arc::new(FakeEmbedder::failing_on_batch(1)),
            TAG,
            options(2),
            &recipe_rows(6),
        )
        .await;

        assert!(matches!(result, Err(RecipeRagError::CorpusError(_))));
        assert_eq!(gate.state(), ServiceState::Loading);
        assert_eq!(index.count_tagged(TAG).await.unwrap(), 2);
    }
}
