//! Ingredient-constrained meal plan generation

use std::sync::Arc;

use tracing::error;
use tracing::info;

use super::context::RequestContext;
use super::parser::parse_meal_plan;
use super::prompts;
use crate::errors::Result;
use crate::llm::Completion;
use crate::models::MealPlan;
use crate::RecipeRagError;

/// Plan length when the caller does not ask for one
pub const DEFAULT_PLAN_DAYS: u32 = 7;

/// Longest plan a single request may ask for
pub const MAX_PLAN_DAYS: u32 = 14;

/// Single model call, no retrieval; independent of corpus state
#[derive(Clone)]
pub struct MealPlanService {
    llm: Arc<dyn Completion>,
}

impl MealPlanService {
    pub fn new(llm: Arc<dyn Completion>) -> Self {
        Self { llm }
    }

    /// Generate a `days`-day plan from `ingredients`.
    ///
    /// Blank ingredient names are ignored; an empty list or a length outside
    /// `1..=MAX_PLAN_DAYS` is rejected before the model is called.
    pub async fn generate(
        &self,
        ingredients: &[String],
        days: u32,
        ctx: &RequestContext,
    ) -> Result<MealPlan> {
        let ingredients: Vec<String> = ingredients
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect();

        if ingredients.is_empty() {
            return Err(RecipeRagError::InvalidRequest(
                "Ingredients array is required".to_string(),
            ));
        }
        if !(1..=MAX_PLAN_DAYS).contains(&days) {
            return Err(RecipeRagError::InvalidRequest(format!(
                "days must be between 1 and {MAX_PLAN_DAYS}"
            )));
        }

        info!(
            "Generating {}-day meal plan for ingredients: {}",
            days,
            ingredients.join(", ")
        );

        let prompt = prompts::meal_plan_prompt(&ingredients, days);
        let raw = ctx.run("meal_plan", self.llm.generate(&prompt)).await?;

        parse_meal_plan(&raw, days).map_err(|failure| {
            error!("Error parsing meal plan JSON: {}", failure.kind);
            error!("Raw LLM response: {}", failure.raw);
            failure.into()
        })
    }
}
