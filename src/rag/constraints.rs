//! Slider/chip preferences to [`ConstraintSet`], and the prompt text built from it

use serde::Deserialize;
use serde::Serialize;

use crate::models::ConstraintSet;
use crate::models::MacroRange;

/// Half-width of the band around a locked calorie target, in kcal
pub const CALORIE_TOLERANCE: f64 = 50.0;

/// Half-width of the band around a locked protein/carbs/fats target, in grams
pub const GRAM_TOLERANCE: f64 = 5.0;

/// Dietary chip values the UI sends, with the label the model sees
const DIETARY_CHIPS: &[(&str, &str)] = &[
    ("vegan", "Vegan"),
    ("glutenfree", "Gluten-Free"),
    ("keto", "Keto"),
    ("halal", "Halal"),
    ("dairyfree", "Dairy-Free"),
];

/// One slider of the preferences panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSlider {
    pub value: f64,
    #[serde(default)]
    pub locked: bool,
    pub min: f64,
    pub max: f64,
}

impl MacroSlider {
    pub const fn new(value: f64, min: f64, max: f64) -> Self {
        Self {
            value,
            locked: false,
            min,
            max,
        }
    }

    #[must_use]
    pub const fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Locked sliders narrow to `value ± tolerance` clipped to the slider bounds;
    /// unlocked sliders pass their bounds through.
    #[must_use]
    pub fn to_range(self, tolerance: f64) -> MacroRange {
        if self.locked {
            MacroRange::new(
                self.min.max(self.value - tolerance),
                self.max.min(self.value + tolerance),
            )
        } else {
            MacroRange::new(self.min, self.max)
        }
    }
}

/// Full slider panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderSettings {
    pub calories: MacroSlider,
    pub protein: MacroSlider,
    pub carbs: MacroSlider,
    pub fats: MacroSlider,
    pub time: MacroSlider,
}

impl Default for SliderSettings {
    fn default() -> Self {
        Self {
            calories: MacroSlider::new(600.0, 200.0, 1500.0),
            protein: MacroSlider::new(30.0, 10.0, 100.0),
            carbs: MacroSlider::new(60.0, 10.0, 150.0),
            fats: MacroSlider::new(20.0, 5.0, 80.0),
            time: MacroSlider::new(30.0, 5.0, 120.0),
        }
    }
}

/// Raw UI preferences as posted alongside a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub sliders: SliderSettings,
    #[serde(default)]
    pub chips: Vec<String>,
}

impl Preferences {
    #[must_use]
    pub fn to_constraints(&self) -> ConstraintSet {
        map_constraints(&self.sliders, &self.chips)
    }
}

/// Display label for a dietary chip, `None` for chips outside the fixed table
#[must_use]
pub fn dietary_label(chip: &str) -> Option<&'static str> {
    DIETARY_CHIPS
        .iter()
        .find(|(key, _)| *key == chip)
        .map(|(_, label)| *label)
}

/// Map the slider panel and selected chips to a fully populated [`ConstraintSet`].
///
/// Time always becomes a `max_time` ceiling; unknown chips are dropped.
#[must_use]
pub fn map_constraints(sliders: &SliderSettings, chips: &[String]) -> ConstraintSet {
    ConstraintSet {
        calories: Some(sliders.calories.to_range(CALORIE_TOLERANCE)),
        protein: Some(sliders.protein.to_range(GRAM_TOLERANCE)),
        carbs: Some(sliders.carbs.to_range(GRAM_TOLERANCE)),
        fats: Some(sliders.fats.to_range(GRAM_TOLERANCE)),
        max_time: Some(sliders.time.value),
        dietary: chips
            .iter()
            .filter_map(|chip| dietary_label(chip))
            .map(str::to_string)
            .collect(),
        allergens: Vec::new(),
        dislikes: Vec::new(),
    }
}

/// Constraint section appended to the recipe system prompt.
///
/// Empty when no line would be emitted, so an unconstrained query carries no header.
#[must_use]
pub fn constraint_prompt_block(constraints: &ConstraintSet) -> String {
    let mut lines = Vec::new();

    if let Some(range) = constraints.calories {
        lines.push(format!("- Calories: {}-{} kcal", range.min, range.max));
    }
    if let Some(range) = constraints.protein {
        lines.push(format!("- Protein: {}-{}g", range.min, range.max));
    }
    if let Some(range) = constraints.carbs {
        lines.push(format!("- Carbs: {}-{}g", range.min, range.max));
    }
    if let Some(range) = constraints.fats {
        lines.push(format!("- Fats: {}-{}g", range.min, range.max));
    }
    if let Some(max_time) = constraints.max_time.filter(|t| *t > 0.0) {
        lines.push(format!("- Cooking Time: Max {max_time} minutes"));
    }
    if !constraints.dietary.is_empty() {
        lines.push(format!(
            "- Dietary Preferences: {}",
            constraints.dietary.join(", ")
        ));
    }
    if !constraints.allergens.is_empty() {
        lines.push(format!(
            "- Avoid These Allergens: {}",
            constraints.allergens.join(", ")
        ));
    }
    if !constraints.dislikes.is_empty() {
        lines.push(format!(
            "- Disliked Ingredients: {}",
            constraints.dislikes.join(", ")
        ));
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut block = String::from("\n\nIMPORTANT CONSTRAINTS FOR THIS RECIPE:\n");
    for line in lines {
        block.push_str(&line);
        block.push('\n');
    }
    block
}
