/// Meal plan handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::ApiError;
use super::AppState;
use crate::api::types::MealPlanRequest;
use crate::api::types::MealPlanResponse;
use crate::rag::RequestContext;
use crate::RecipeRagError;

/// POST /api/meal-plan
pub async fn meal_plan(
    State(state): State<AppState>,
    payload: Result<Json<MealPlanRequest>, JsonRejection>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    if state.gate_meal_plan && !state.readiness.is_ready() {
        return Err(RecipeRagError::NotReady.into());
    }

    let Json(req) = payload.map_err(|e| RecipeRagError::InvalidRequest(e.body_text()))?;
    let (ingredients, days) = req.validate()?;
    info!("POST /api/meal-plan: {} ingredients, {} days", ingredients.len(), days);

    let ctx = RequestContext::with_timeout(state.meal_plan_timeout);
    let _guard = ctx.cancellation_token().drop_guard();

    let plan = state.meal_plans.generate(&ingredients, days, &ctx).await?;
    Ok(Json(MealPlanResponse::new(plan)))
}
