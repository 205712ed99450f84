//! Domain types shared by the corpus loader, the pipelines and the HTTP surface

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Metadata key partitioning documents into independent corpora
pub const DATASET_TAG_KEY: &str = "dataset_tag";

/// Corpus unit stored in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Flattened row text
    pub content: String,
    /// Original row fields plus `dataset_tag`
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Map::new(),
        }
    }

    /// Return this document tagged with `dataset_tag`, replacing any previous tag
    #[must_use]
    pub fn tagged(mut self, dataset_tag: &str) -> Self {
        self.metadata.insert(
            DATASET_TAG_KEY.to_string(),
            Value::String(dataset_tag.to_string()),
        );
        self
    }

    pub fn dataset_tag(&self) -> Option<&str> {
        self.metadata.get(DATASET_TAG_KEY).and_then(Value::as_str)
    }
}

/// Hard metadata filter applied to every similarity search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    pub dataset_tag: String,
}

impl MetadataFilter {
    pub fn dataset(tag: impl Into<String>) -> Self {
        Self {
            dataset_tag: tag.into(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        document.dataset_tag() == Some(self.dataset_tag.as_str())
    }
}

// ====== Conversation ======

/// Speaker of a transcript turn as the language model sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Human,
    Ai,
}

impl ChatRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Ai => "ai",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            content: content.into(),
        }
    }
}

/// Speaker of a chat message as the web UI records it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiRole {
    User,
    Bot,
}

/// Recipe attached to a UI chat bubble.
///
/// The UI keeps partially filled recipes; only the title matters server-side
/// and every other field is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiRecipe {
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl UiRecipe {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rest: Map::new(),
        }
    }
}

/// Chat message as held by the web UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: UiRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<UiRecipe>,
    #[serde(default)]
    pub is_error: bool,
}

// ====== Constraints ======

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRange {
    pub min: f64,
    pub max: f64,
}

impl MacroRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Nutrition and dietary constraints for one recipe request.
///
/// Every field is optional on the wire; the constraint mapper always fills the macro ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<MacroRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<MacroRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<MacroRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<MacroRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

// ====== Generated artifacts ======

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy", alias = "EASY")]
    Easy,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Hard", alias = "HARD")]
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Structured recipe extracted from a model response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub summary: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub macros: Macros,
    pub time: f64,
    pub difficulty: Difficulty,
    pub servings: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    #[serde(alias = "Breakfast")]
    Breakfast,
    #[serde(alias = "Lunch")]
    Lunch,
    #[serde(alias = "Dinner")]
    Dinner,
}

impl MealType {
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day: u32,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub title: String,
    pub description: String,
    pub days: Vec<Day>,
}
