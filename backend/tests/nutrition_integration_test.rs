//! Integration tests for stored-profile targets and meal recommendations

mod common;

use axum::http::StatusCode;
use common::{StubGenerator, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_my_targets_match_public_calculator() {
    let app = TestApp::new().await;
    let (_, token) = app.new_user();
    app.seed_profile(&token, "lose_weight").await;

    let (status, mine) = app.get("/api/v1/nutrition/targets", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({
        "goal": "lose_weight", "weight": 80, "height": 180, "age": 30,
        "gender": "male", "activityLevel": "moderate"
    });
    let (_, public) = app.post("/api/v1/nutrition/targets", &body, None).await;

    assert_eq!(mine["targets"], public);
    assert_eq!(mine["targets"]["calories"], 2259);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_my_targets_with_incomplete_profile() {
    let app = TestApp::new().await;
    let (_, token) = app.new_user();
    app.put("/api/v1/profile", &json!({ "height_cm": 170.0 }), &token).await;

    let (status, response) = app.get("/api/v1/nutrition/targets", Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "PROFILE_INCOMPLETE");
    let missing = response["error"]["details"]["missing_fields"].as_array().unwrap();
    assert!(missing.contains(&json!("current_weight")));
    assert!(!missing.contains(&json!("height_cm")));

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_plan_uses_computed_targets() {
    let app = TestApp::new().await;
    let (_, token) = app.new_user();
    app.seed_profile(&token, "maintain_weight").await;

    let (status, response) = app
        .post("/api/v1/nutrition/meal-plan", &json!({}), Some(&token))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["targets"]["calories"], 2759);
    assert_eq!(response["meal_plan"]["breakfast"][0]["name"], "Greek yogurt with berries");

    let prompts = app.meal_generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("2759 kcal"));

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_plan_generator_failure_keeps_targets() {
    let app = TestApp::with_generators(
        StubGenerator::replying("plans", common::PLAN_REPLY),
        StubGenerator::failing("meals"),
    )
    .await;
    let (_, token) = app.new_user();
    app.seed_profile(&token, "maintain_weight").await;

    let (status, response) = app
        .post("/api/v1/nutrition/meal-plan", &json!({}), Some(&token))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"]["code"], "UPSTREAM_GENERATION_ERROR");
    assert_eq!(response["error"]["details"]["reason"], "rate_limited");
    assert_eq!(response["error"]["details"]["targets"]["calories"], 2759);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_plan_rejects_unparseable_reply() {
    let app = TestApp::with_generators(
        StubGenerator::replying("plans", common::PLAN_REPLY),
        StubGenerator::replying("meals", "Sorry, I can only describe meals in prose."),
    )
    .await;
    let (_, token) = app.new_user();
    app.seed_profile(&token, "gain_weight").await;

    let (status, response) = app
        .post("/api/v1/nutrition/meal-plan", &json!({}), Some(&token))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"]["details"]["reason"], "malformed_json");

    app.cleanup().await;
}
