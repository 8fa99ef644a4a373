//! AI plan routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use fitness_planner_shared::types::{GeneratePlanRequest, GeneratePlanResponse, PlanResponse};
use fitness_planner_shared::PlanType;
use uuid::Uuid;

/// Create plan routes
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(generate_plan))
        .route("/:id", delete(deactivate_plan))
}

/// GET /api/v1/plans - Active plans, newest first
async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = PlanService::list_active(state.db(), auth.user_id).await?;
    Ok(Json(plans))
}

/// POST /api/v1/plans - Generate a new plan
async fn generate_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<GeneratePlanRequest>,
) -> Result<(StatusCode, Json<GeneratePlanResponse>), ApiError> {
    let plan_type: PlanType = req.plan_type.parse()?;

    let response = PlanService::generate(
        state.db(),
        state.plan_generator.as_ref(),
        auth.user_id,
        plan_type,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/v1/plans/:id - Deactivate a plan
async fn deactivate_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PlanService::deactivate(state.db(), auth.user_id, plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
