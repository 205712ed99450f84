/// Recipe query handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::ApiError;
use super::AppState;
use crate::api::types::QueryRequest;
use crate::api::types::RecipeResponse;
use crate::rag::RequestContext;
use crate::RecipeRagError;

/// POST /api/query
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    if !state.readiness.is_ready() {
        return Err(RecipeRagError::NotReady.into());
    }

    let Json(req) = payload.map_err(|e| RecipeRagError::InvalidRequest(e.body_text()))?;
    let query = req.into_query()?;
    info!("POST /api/query: {}", query.question);

    // Dropping the handler (client went away) cancels every upstream call
    let ctx = RequestContext::with_timeout(state.query_timeout);
    let _guard = ctx.cancellation_token().drop_guard();

    let recipe = state.recipes.query(&query, &ctx).await?;
    Ok(Json(RecipeResponse::new(recipe)))
}
