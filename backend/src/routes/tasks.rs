//! Daily task routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::services::TaskService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use fitness_planner_shared::types::{DailyTaskResponse, TaskQuery, UpdateTaskRequest};
use uuid::Uuid;

/// Create task routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks))
        .route("/:id", put(update_task))
}

/// GET /api/v1/tasks?date=YYYY-MM-DD - Tasks for a day, today (UTC) by default
async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<DailyTaskResponse>>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let tasks = TaskService::list_for_date(state.db(), auth.user_id, date).await?;
    Ok(Json(tasks))
}

/// PUT /api/v1/tasks/:id - Mark a task done or undone
async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<DailyTaskResponse>, ApiError> {
    let task = TaskService::set_completed(state.db(), auth.user_id, task_id, req.completed).await?;
    Ok(Json(task))
}
