//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::models::ChatTurn;
use crate::models::ConstraintSet;
use crate::models::MealPlan;
use crate::models::Recipe;
use crate::models::UiMessage;
use crate::rag::history::normalize;
use crate::rag::meal_plan::DEFAULT_PLAN_DAYS;
use crate::rag::Preferences;
use crate::rag::RecipeQuery;
use crate::RecipeRagError;
use crate::Result;

/// `POST /api/query` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// History already in model-facing form
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
    /// Raw UI messages, normalized and appended after `chat_history`
    #[serde(default)]
    pub messages: Vec<UiMessage>,
    #[serde(default)]
    pub constraints: Option<ConstraintSet>,
    /// Raw slider/chip state, used when `constraints` is absent
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl QueryRequest {
    /// Validate and flatten into a pipeline query
    pub fn into_query(self) -> Result<RecipeQuery> {
        let question = self
            .question
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| RecipeRagError::InvalidRequest("Question is required".to_string()))?;

        let mut history = self.chat_history;
        history.extend(normalize(&self.messages));

        let constraints = match (self.constraints, self.preferences) {
            (Some(constraints), _) => constraints,
            (None, Some(preferences)) => preferences.to_constraints(),
            (None, None) => ConstraintSet::default(),
        };

        Ok(RecipeQuery {
            question,
            history,
            constraints,
        })
    }
}

/// `POST /api/meal-plan` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPlanRequest {
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub days: Option<u32>,
}

impl MealPlanRequest {
    /// Non-empty ingredient list and plan length, defaulting to a week
    pub fn validate(self) -> Result<(Vec<String>, u32)> {
        let ingredients = self
            .ingredients
            .filter(|list| list.iter().any(|i| !i.trim().is_empty()))
            .ok_or_else(|| {
                RecipeRagError::InvalidRequest("Ingredients array is required".to_string())
            })?;
        Ok((ingredients, self.days.unwrap_or(DEFAULT_PLAN_DAYS)))
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub success: bool,
    pub recipe: Recipe,
}

impl RecipeResponse {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            success: true,
            recipe,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub success: bool,
    pub meal_plan: MealPlan,
}

impl MealPlanResponse {
    pub fn new(meal_plan: MealPlan) -> Self {
        Self {
            success: true,
            meal_plan,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRole;
    use crate::models::MacroRange;

    #[test]
    fn test_query_request_merges_history_sources() {
        let req: QueryRequest = serde_json::from_str(
            r#"{
                "question": "and for two?",
                "chatHistory": [{"role": "human", "content": "pasta"}],
                "messages": [
                    {"role": "bot", "content": "oops", "isError": true},
                    {"role": "bot", "content": "try this", "recipe": null}
                ]
            }"#,
        )
        .unwrap();

        let query = req.into_query().unwrap();
        assert_eq!(query.history.len(), 2);
        assert_eq!(query.history[1].role, ChatRole::Ai);
        assert_eq!(query.history[1].content, "try this");
    }

    #[test]
    fn test_partial_ui_recipe_is_normalized_by_title() {
        let req: QueryRequest = serde_json::from_str(
            r#"{
                "question": "make it spicier",
                "messages": [
                    {"role": "user", "content": "something fast"},
                    {
                        "role": "bot",
                        "content": "Try this",
                        "recipe": {"title": "Quick Stir-Fry", "ingredients": ["rice"], "steps": ["Cook"]}
                    }
                ]
            }"#,
        )
        .unwrap();

        let query = req.into_query().unwrap();
        assert_eq!(query.history.len(), 2);
        assert_eq!(query.history[1].content, "Try this\n\nRecipe: Quick Stir-Fry");
    }

    #[test]
    fn test_explicit_constraints_win_over_preferences() {
        let req: QueryRequest = serde_json::from_str(
            r#"{
                "question": "dinner",
                "constraints": {"calories": {"min": 450, "max": 550}},
                "preferences": {"chips": ["vegan"]}
            }"#,
        )
        .unwrap();

        let query = req.into_query().unwrap();
        assert_eq!(
            query.constraints.calories,
            Some(MacroRange::new(450.0, 550.0))
        );
        assert!(query.constraints.dietary.is_empty());
    }

    #[test]
    fn test_preferences_are_mapped_when_alone() {
        let req: QueryRequest =
            serde_json::from_str(r#"{"question": "dinner", "preferences": {"chips": ["halal"]}}"#)
                .unwrap();
        let query = req.into_query().unwrap();
        assert_eq!(query.constraints.dietary, vec!["Halal"]);
        assert_eq!(query.constraints.max_time, Some(30.0));
    }

    #[test]
    fn test_blank_question_is_rejected() {
        let req = QueryRequest {
            question: Some("   ".to_string()),
            ..QueryRequest::default()
        };
        let err = req.into_query().unwrap_err();
        assert_eq!(err.to_string(), "Question is required");
    }

    #[test]
    fn test_meal_plan_request_defaults_to_a_week() {
        let req: MealPlanRequest = serde_json::from_str(r#"{"ingredients": ["rice"]}"#).unwrap();
        let (ingredients, days) = req.validate().unwrap();
        assert_eq!(ingredients, vec!["rice"]);
        assert_eq!(days, 7);
    }

    #[test]
    fn test_meal_plan_request_rejects_empty_lists() {
        for body in [r#"{}"#, r#"{"ingredients": []}"#, r#"{"ingredients": ["  "]}"#] {
            let req: MealPlanRequest = serde_json::from_str(body).unwrap();
            assert!(matches!(
                req.validate(),
                Err(RecipeRagError::InvalidRequest(_))
            ));
        }
    }
}
