//! Structured output extraction from free-text model responses
//!
//! The outermost `{ ... }` span is cut out of the response (models like to wrap
//! JSON in prose or code fences), parsed, then checked against the target shape.
//! Every failure carries the raw response for logging.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::MealPlan;
use crate::models::MealType;
use crate::models::Recipe;

/// What a response was supposed to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTarget {
    Recipe,
    MealPlan,
}

impl ParseTarget {
    /// Generic message handed to API callers
    #[must_use]
    pub const fn public_message(self) -> &'static str {
        match self {
            Self::Recipe => "Failed to parse recipe data from LLM response",
            Self::MealPlan => "Failed to parse meal plan data from LLM response",
        }
    }
}

impl fmt::Display for ParseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recipe => f.write_str("recipe"),
            Self::MealPlan => f.write_str("meal plan"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailureKind {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// A model response that could not be turned into the expected structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} ({kind})", .target.public_message())]
pub struct ParseFailure {
    pub target: ParseTarget,
    pub kind: ParseFailureKind,
    /// Unmodified model output, for logs only
    pub raw: String,
}

impl ParseFailure {
    fn new(target: ParseTarget, kind: ParseFailureKind, raw: &str) -> Self {
        Self {
            target,
            kind,
            raw: raw.to_string(),
        }
    }

    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        self.target.public_message()
    }
}

/// Span from the first `{` to the last `}`, inclusive
#[must_use]
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

fn parse_as<T: DeserializeOwned>(raw: &str, target: ParseTarget) -> Result<T, ParseFailure> {
    let span = extract_json_object(raw)
        .ok_or_else(|| ParseFailure::new(target, ParseFailureKind::NoJsonObject, raw))?;

    let value: Value = serde_json::from_str(span).map_err(|e| {
        ParseFailure::new(target, ParseFailureKind::InvalidJson(e.to_string()), raw)
    })?;

    serde_json::from_value(value).map_err(|e| {
        ParseFailure::new(target, ParseFailureKind::SchemaMismatch(e.to_string()), raw)
    })
}

/// Parse a [`Recipe`]; missing fields, empty titles and empty ingredient or
/// step lists are rejected.
pub fn parse_recipe(raw: &str) -> Result<Recipe, ParseFailure> {
    let recipe: Recipe = parse_as(raw, ParseTarget::Recipe)?;

    let mismatch = |reason: &str| {
        ParseFailure::new(
            ParseTarget::Recipe,
            ParseFailureKind::SchemaMismatch(reason.to_string()),
            raw,
        )
    };
    if recipe.title.trim().is_empty() {
        return Err(mismatch("empty title"));
    }
    if recipe.ingredients.is_empty() {
        return Err(mismatch("no ingredients"));
    }
    if recipe.steps.is_empty() {
        return Err(mismatch("no steps"));
    }

    Ok(recipe)
}

/// Parse a [`MealPlan`] of exactly `days` days, each with one breakfast, one
/// lunch and one dinner.
pub fn parse_meal_plan(raw: &str, days: u32) -> Result<MealPlan, ParseFailure> {
    let plan: MealPlan = parse_as(raw, ParseTarget::MealPlan)?;

    let mismatch = |reason: String| {
        ParseFailure::new(
            ParseTarget::MealPlan,
            ParseFailureKind::SchemaMismatch(reason),
            raw,
        )
    };

    if plan.days.len() != days as usize {
        return Err(mismatch(format!(
            "expected {days} days, got {}",
            plan.days.len()
        )));
    }

    let numbering: Vec<u32> = plan.days.iter().map(|d| d.day).collect();
    if !numbering.iter().copied().eq(1..=days) {
        return Err(mismatch(format!(
            "days must be numbered 1..={days} in order, got {numbering:?}"
        )));
    }

    let required: BTreeSet<MealType> = MealType::ALL.into_iter().collect();
    for day in &plan.days {
        let types: BTreeSet<MealType> = day.meals.iter().map(|m| m.meal_type).collect();
        if day.meals.len() != MealType::ALL.len() || types != required {
            let found: Vec<&str> = day.meals.iter().map(|m| m.meal_type.as_str()).collect();
            return Err(mismatch(format!(
                "day {} must have one breakfast, lunch and dinner, got [{}]",
                day.day,
                found.join(", ")
            )));
        }
    }

    Ok(plan)
}
