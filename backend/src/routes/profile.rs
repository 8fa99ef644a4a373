//! User profile API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use fitness_planner_shared::types::{
    ProfileCompletionResponse, ProfileResponse, UpdateProfileRequest,
};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/completion", get(get_completion))
}

/// GET /api/v1/profile - Get user profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileService::get_profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile - Create or partially update the profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileService::update_profile(state.db(), auth.user_id, req).await?;
    Ok(Json(profile))
}

/// GET /api/v1/profile/completion - Fields still needed for targets
async fn get_completion(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileCompletionResponse>, ApiError> {
    let completion = ProfileService::completion(state.db(), auth.user_id).await?;
    Ok(Json(completion))
}
