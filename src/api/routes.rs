//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Recipe endpoints
        .route("/api/query", post(handlers::query))
        .route("/api/meal-plan", post(handlers::meal_plan))
        .with_state(state)
}
