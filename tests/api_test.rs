//! HTTP behaviour of the recipe API over in-memory providers

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use common::app_state;
use common::ready_gate;
use common::QueuedLlm;
use common::RECIPE_JSON;
use recipe_rag::api::routes::api_routes;
use recipe_rag::api::ReadinessGate;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_is_always_up() {
    let llm = Arc::new(QueuedLlm::default());
    let app = api_routes(app_state(llm, ReadinessGate::new()).await);

    let (status, body) = send(app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "message": "RAG API server is running"}));
}

#[tokio::test]
async fn test_query_while_loading_is_unavailable() {
    let llm = Arc::new(QueuedLlm::new(&["unused", RECIPE_JSON]));
    let gate = ReadinessGate::new();
    gate.begin_loading();
    let app = api_routes(app_state(llm.clone(), gate).await);

    let (status, body) = send(
        app,
        "POST",
        "/api/query",
        Some(json!({"question": "vegan curry?"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["error"],
        json!("RAG service is initializing, please try again in a moment")
    );
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_query_returns_recipe_when_ready() {
    let llm = Arc::new(QueuedLlm::new(&["vegan curry under 600 calories", RECIPE_JSON]));
    let app = api_routes(app_state(llm.clone(), ready_gate()).await);

    let (status, body) = send(
        app,
        "POST",
        "/api/query",
        Some(json!({
            "question": "something vegan and quick",
            "chatHistory": [],
            "constraints": {
                "calories": {"min": 550, "max": 650},
                "maxTime": 30,
                "dietary": ["Vegan"]
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["recipe"]["title"], json!("Chickpea Curry"));
    assert_eq!(body["recipe"]["difficulty"], json!("easy"));

    let compose = &llm.prompts()[1];
    assert!(compose.system.contains("- Dietary Preferences: Vegan"));
    assert!(compose.system.contains("- Cooking Time: Max 30 minutes"));
    assert!(compose.system.contains("--- Recipe ---"));
}

#[tokio::test]
async fn test_query_accepts_ui_messages_and_preferences() {
    let llm = Arc::new(QueuedLlm::new(&["spicier chickpea curry", RECIPE_JSON]));
    let app = api_routes(app_state(llm.clone(), ready_gate()).await);

    let (status, _) = send(
        app,
        "POST",
        "/api/query",
        Some(json!({
            "question": "make it spicier",
            "messages": [
                {"role": "user", "content": "vegan dinner?"},
                {"role": "bot", "content": "Here is a recipe", "isError": false}
            ],
            "preferences": {"chips": ["vegan"]}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prompts = llm.prompts();
    assert!(prompts[0]
        .system
        .contains("human: vegan dinner?\nai: Here is a recipe"));
    assert!(prompts[1].system.contains("- Dietary Preferences: Vegan"));
}

#[tokio::test]
async fn test_query_without_question_is_rejected() {
    let llm = Arc::new(QueuedLlm::default());
    let app = api_routes(app_state(llm.clone(), ready_gate()).await);

    let (status, body) = send(app, "POST", "/api/query", Some(json!({"chatHistory": []}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Question is required"}));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_bad_request() {
    let llm = Arc::new(QueuedLlm::default());
    let app = api_routes(app_state(llm, ready_gate()).await);

    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unparseable_model_output_is_a_generic_500() {
    let llm = Arc::new(QueuedLlm::new(&[
        "curry",
        "I would love to help but here is prose instead",
    ]));
    let app = api_routes(app_state(llm, ready_gate()).await);

    let (status, body) = send(
        app,
        "POST",
        "/api/query",
        Some(json!({"question": "curry"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"success": false, "error": "Failed to parse recipe data from LLM response"})
    );
}

#[tokio::test]
async fn test_meal_plan_requires_ingredients() {
    let llm = Arc::new(QueuedLlm::default());
    let app = api_routes(app_state(llm.clone(), ready_gate()).await);

    let (status, body) = send(
        app,
        "POST",
        "/api/meal-plan",
        Some(json!({"ingredients": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Ingredients array is required"})
    );
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_meal_plan_returns_plan() {
    let meals = r#"[{"title":"Eggs","description":"Scrambled","type":"breakfast"},{"title":"Rice","description":"Steamed","type":"lunch"},{"title":"Fried rice","description":"With eggs","type":"dinner"}]"#;
    let plan = format!(
        r#"{{"title":"2-Day Meal Plan","description":"Simple","days":[{{"day":1,"meals":{meals}}},{{"day":2,"meals":{meals}}}]}}"#
    );
    let llm = Arc::new(QueuedLlm::new(&[plan.as_str()]));
    let app = api_routes(app_state(llm.clone(), ready_gate()).await);

    let (status, body) = send(
        app,
        "POST",
        "/api/meal-plan",
        Some(json!({"ingredients": ["eggs", "rice"], "days": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["mealPlan"]["days"].as_array().unwrap().len(), 2);
    assert_eq!(body["mealPlan"]["days"][0]["meals"][2]["type"], json!("dinner"));
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_meal_plan_is_gated_on_the_corpus_by_default() {
    let llm = Arc::new(QueuedLlm::default());
    let app = api_routes(app_state(llm, ReadinessGate::new()).await);

    let (status, _) = send(
        app,
        "POST",
        "/api/meal-plan",
        Some(json!({"ingredients": ["eggs"]})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_meal_plan_ungated_when_configured() {
    let llm = Arc::new(QueuedLlm::default());
    let mut state = app_state(llm, ReadinessGate::new()).await;
    state.gate_meal_plan = false;
    let app = api_routes(state);

    let (status, body) = send(
        app,
        "POST",
        "/api/meal-plan",
        Some(json!({"ingredients": []})),
    )
    .await;

    // Validation runs, so the gate was skipped
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}
