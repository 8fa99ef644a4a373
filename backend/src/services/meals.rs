//! Meal recommendation service

use crate::error::ApiError;
use crate::llm::{parse_json, GenerationError, GenerationRequest, TextGenerator};
use crate::services::targets::TargetService;
use fitness_planner_shared::types::{MealPlan, MealPlanResponse};
use fitness_planner_shared::TargetBreakdownResponse;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

const MEAL_SYSTEM_PROMPT: &str = "You are a nutrition expert. Create practical, healthy meal plans \
     that hit the given daily targets. Respond with valid JSON only.";

/// Build the meal prompt. Targets are fixed; the generator only picks food.
pub fn build_meal_prompt(breakdown: &TargetBreakdownResponse) -> String {
    let targets = &breakdown.targets;
    format!(
        "Create a one-day meal plan for someone whose goal is {goal}. \
         Current weight: {weight} kg, height: {height} cm.\n\
         Daily targets: {calories} kcal, {protein} g protein, {carbs} g carbs, {fat} g fat. \
         Use these numbers as given.\n\n\
         Respond with a JSON object with keys \"breakfast\", \"lunch\", \"dinner\" and \"snacks\", \
         each an array of {{\"name\", \"calories\", \"protein\", \"carbs\", \"fat\"}}, and a \
         \"summary\" object with the day's totals in the same fields.",
        goal = breakdown.goal.description(),
        weight = breakdown.profile.weight_kg(),
        height = breakdown.profile.height_cm(),
        calories = targets.calories,
        protein = targets.protein_grams,
        carbs = targets.carbs_grams,
        fat = targets.fat_grams,
    )
}

/// Parse the generator output into a meal plan with at least one item
pub fn parse_meal_plan(text: &str) -> Result<MealPlan, GenerationError> {
    let plan: MealPlan = parse_json(text)?;
    if plan.is_empty() {
        return Err(GenerationError::MalformedJson(
            "meal plan has no meals".to_string(),
        ));
    }
    Ok(plan)
}

/// Meal service
pub struct MealService;

impl MealService {
    /// Recommend a day of meals for the user's stored profile
    pub async fn recommend(
        db: &PgPool,
        generator: &dyn TextGenerator,
        user_id: Uuid,
    ) -> Result<MealPlanResponse, ApiError> {
        let breakdown = TargetService::for_user(db, user_id).await?;
        let targets = breakdown.targets;

        let request = GenerationRequest::new(MEAL_SYSTEM_PROMPT, build_meal_prompt(&breakdown));
        let meal_plan = generator
            .generate(&request)
            .await
            .and_then(|text| parse_meal_plan(&text))
            .map_err(|e| {
                warn!(user_id = %user_id, reason = e.reason(), "Meal generation failed");
                ApiError::generation_with_targets(e, targets)
            })?;

        let totals = meal_plan.item_totals();
        info!(
            user_id = %user_id,
            target_calories = targets.calories,
            item_calories = totals.calories,
            "Meal plan generated"
        );

        Ok(MealPlanResponse { targets, meal_plan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitness_planner_shared::TargetInput;

    fn breakdown() -> TargetBreakdownResponse {
        TargetService::breakdown(&TargetInput {
            goal: Some("lose_weight".to_string()),
            weight: Some(80.0),
            height: Some(180.0),
            age: Some(30.0),
            gender: Some("male".to_string()),
            activity_level: Some("moderate".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_prompt_carries_targets_and_body() {
        let prompt = build_meal_prompt(&breakdown());
        assert!(prompt.contains("2259 kcal, 128 g protein, 295 g carbs, 63 g fat"));
        assert!(prompt.contains("Current weight: 80 kg, height: 180 cm"));
        assert!(prompt.contains("\"summary\""));
    }

    #[test]
    fn test_parse_meal_plan_from_fenced_output() {
        let text = r#"Here you go:
```json
{"breakfast":[{"name":"Oats","calories":350,"protein":12,"carbs":60,"fat":6}],
 "lunch":[],"dinner":[],"snacks":[],
 "summary":{"calories":350,"protein":12,"carbs":60,"fat":6}}
```"#;
        let plan = parse_meal_plan(text).unwrap();
        assert_eq!(plan.breakfast[0].name, "Oats");
        assert_eq!(plan.summary.unwrap().calories, 350.0);
    }

    #[test]
    fn test_parse_meal_plan_rejects_empty_plan() {
        let err = parse_meal_plan(r#"{"breakfast":[],"lunch":[]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedJson(_)));
    }

    #[test]
    fn test_parse_meal_plan_rejects_prose() {
        assert!(parse_meal_plan("I cannot help with that.").is_err());
    }
}
