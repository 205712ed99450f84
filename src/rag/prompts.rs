//! Prompt templates for every model call in the pipelines

use super::constraints::constraint_prompt_block;
use crate::llm::ChatPrompt;
use crate::models::ConstraintSet;

const CONDENSE_SYSTEM: &str = "Given the following chat history and a follow up question, \
rephrase the follow up question to be a standalone question.\n\nChat History:\n";

const RECIPE_SYSTEM: &str = "You are a helpful recipe and cooking assistant. \
Your job is to answer the user's question about recipes.\n\n\
CONTEXT from our recipe database is provided below. If the CONTEXT contains relevant recipes, use them as inspiration. \
If the CONTEXT is NOT relevant or doesn't contain good matches, use your own knowledge to create a recipe that fits the user's request.\n\n\
CRITICAL: You MUST respond with ONLY a valid JSON object in this exact format:\n";

const RECIPE_TEMPLATE: &str = r#"{
  "title": "Recipe Name",
  "summary": "Brief description of the recipe",
  "ingredients": ["200g chicken breast", "1 cup rice", "2 tbsp soy sauce"],
  "steps": ["Step 1 description", "Step 2 description", "Step 3 description"],
  "macros": {"calories": 450, "protein": 35, "carbs": 50, "fats": 10},
  "time": 25,
  "difficulty": "easy",
  "servings": 2,
  "explanation": "Why this recipe fits your requirements and preferences"
}"#;

const RECIPE_RULES: &str = "\n\nIMPORTANT INSTRUCTIONS FOR STEPS:\n\
- Keep each step concise but clear (1-2 sentences max)\n\
- Include key cooking times and temperatures when relevant\n\
- Add brief visual cues for doneness (e.g., 'until golden', 'fragrant')\n\n\
IMPORTANT: Always respect the user's dietary constraints and nutritional requirements provided below.\n\
Do NOT include any text before or after the JSON. Only output valid JSON.\n\
The difficulty must be one of: easy, medium, or hard.";

const COOKING_SYSTEM: &str = "You are a helpful recipe and cooking assistant. \
Your job is to answer the user's question about recipes or cooking techniques.\n\n\
Use the following retrieved CONTEXT to answer. If the context is relevant, use it as your primary source of information.\n\n\
If the question is about cooking but the CONTEXT doesn't have the answer (like 'what does saute mean?'), \
you can use your general knowledge to answer.\n\n\
If the question is NOT about cooking or recipes, politely state that you can only help with cooking-related topics.";

/// Rewrite a follow-up into a self-contained question
#[must_use]
pub fn condense_prompt(question: &str, chat_history: &str) -> ChatPrompt {
    ChatPrompt::new(
        format!("{CONDENSE_SYSTEM}{chat_history}"),
        format!("Follow Up Input: {question}\nStandalone question:"),
    )
}

/// Structured recipe answer, JSON only
#[must_use]
pub fn recipe_prompt(
    question: &str,
    context: &str,
    chat_history: &str,
    constraints: &ConstraintSet,
) -> ChatPrompt {
    let system = format!(
        "{RECIPE_SYSTEM}{RECIPE_TEMPLATE}{RECIPE_RULES}{}\n\nChat History:\n{chat_history}\n\nCONTEXT:\n{context}",
        constraint_prompt_block(constraints)
    );
    ChatPrompt::new(system, format!("QUESTION:\n{question}"))
}

/// Free-text cooking answer used by the terminal chat
#[must_use]
pub fn cooking_prompt(question: &str, context: &str, chat_history: &str) -> ChatPrompt {
    ChatPrompt::new(
        format!("{COOKING_SYSTEM}\n\nChat History:\n{chat_history}\n\nCONTEXT:\n{context}"),
        format!("QUESTION:\n{question}"),
    )
}

/// Meal plan over `days` days using only the listed ingredients
#[must_use]
pub fn meal_plan_prompt(ingredients: &[String], days: u32) -> ChatPrompt {
    let system = format!(
        r#"Create a {days}-day meal plan. Return ONLY valid JSON:
{{"title":"{days}-Day Meal Plan","description":"Weekly meals","days":[{{"day":1,"meals":[{{"title":"Meal Name","description":"Brief desc","type":"breakfast","ingredients":["item1","item2"],"steps":["Step 1","Step 2"],"time":15}},{{"title":"...","type":"lunch",...}},{{"title":"...","type":"dinner",...}}]}},{{"day":2,"meals":[...]}},...]}}

Rules:
- Use ONLY the given ingredients
- {days} days, each with breakfast/lunch/dinner
- Each meal: title, description (10 words max), type, ingredients array, steps array (3-4 simple steps), time (minutes)
- Keep steps simple and brief
- Output JSON only"#
    );
    ChatPrompt::new(system, format!("Ingredients: {}", ingredients.join(", ")))
}
