/// API request handlers
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;
use tracing::warn;

use crate::api::types::ErrorResponse;
use crate::api::types::HealthResponse;
use crate::RecipeRagError;

pub mod meal_plan;
pub mod query;

pub use meal_plan::*;
pub use query::*;

pub use crate::api::state::AppState;

/// Error leaving a handler as `{success: false, error}`
#[derive(Debug)]
pub struct ApiError(pub RecipeRagError);

impl From<RecipeRagError> for ApiError {
    fn from(err: RecipeRagError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self.0);
        } else {
            warn!("Request rejected ({}): {}", status, self.0);
        }
        (status, Json(ErrorResponse::new(self.0.public_message()))).into_response()
    }
}

/// Health check handler
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            message: "RAG API server is running".to_string(),
        }),
    )
}
