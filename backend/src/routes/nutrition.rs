//! Calorie target and meal recommendation routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{MealService, TargetService};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use crate::extract::ValidatedJson;
use fitness_planner_shared::types::{MealPlanResponse, TargetBreakdownResponse, TargetInput};
use fitness_planner_shared::MacroTargets;
use tracing::debug;

/// Create nutrition routes
pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/targets", post(compute_targets).get(get_my_targets))
        .route("/targets/breakdown", post(compute_breakdown))
        .route("/meal-plan", post(recommend_meals))
}

/// POST /api/v1/nutrition/targets - Targets for an ad-hoc profile
///
/// Public: no account or stored profile is needed. Responds with
/// `{ calories, protein, carbs, fat }`.
async fn compute_targets(
    ValidatedJson(input): ValidatedJson<TargetInput>,
) -> Result<Json<MacroTargets>, ApiError> {
    let targets = TargetService::compute(&input)?;
    debug!(calories = targets.calories, "Computed ad-hoc targets");
    Ok(Json(targets))
}

/// POST /api/v1/nutrition/targets/breakdown - Ad-hoc targets with BMR, TDEE
/// and the parsed profile
async fn compute_breakdown(
    ValidatedJson(input): ValidatedJson<TargetInput>,
) -> Result<Json<TargetBreakdownResponse>, ApiError> {
    let breakdown = TargetService::breakdown(&input)?;
    Ok(Json(breakdown))
}

/// GET /api/v1/nutrition/targets - Targets from the stored profile
async fn get_my_targets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TargetBreakdownResponse>, ApiError> {
    let breakdown = TargetService::for_user(state.db(), auth.user_id).await?;
    Ok(Json(breakdown))
}

/// POST /api/v1/nutrition/meal-plan - AI meal recommendation
async fn recommend_meals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let response =
        MealService::recommend(state.db(), state.meal_generator.as_ref(), auth.user_id).await?;
    Ok(Json(response))
}
