//! Daily task service

use crate::error::ApiError;
use crate::repositories::{TaskRecord, TaskRepository};
use anyhow::anyhow;
use chrono::NaiveDate;
use fitness_planner_shared::types::DailyTaskResponse;
use fitness_planner_shared::TaskType;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub(crate) fn task_response(record: TaskRecord) -> Result<DailyTaskResponse, ApiError> {
    let task_type = record
        .task_type
        .parse::<TaskType>()
        .map_err(|e| anyhow!("stored task {} has invalid type: {}", record.id, e))?;

    Ok(DailyTaskResponse {
        id: record.id,
        plan_id: record.plan_id,
        task_type,
        title: record.title,
        target_date: record.target_date,
        is_completed: record.is_completed,
        completed_at: record.completed_at,
    })
}

/// Task service
pub struct TaskService;

impl TaskService {
    /// Tasks scheduled for one day
    pub async fn list_for_date(
        db: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DailyTaskResponse>, ApiError> {
        TaskRepository::list_for_date(db, user_id, date)
            .await?
            .into_iter()
            .map(task_response)
            .collect()
    }

    /// Mark a task done or undone
    pub async fn set_completed(
        db: &PgPool,
        user_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<DailyTaskResponse, ApiError> {
        let record = TaskRepository::set_completed(db, user_id, task_id, completed)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        info!(user_id = %user_id, task_id = %task_id, completed, "Task updated");
        task_response(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(task_type: &str) -> TaskRecord {
        TaskRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: None,
            task_type: task_type.to_string(),
            title: "Walk 30 minutes".to_string(),
            target_date: Utc::now().date_naive(),
            is_completed: true,
            completed_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_task_response_parses_type() {
        let response = task_response(record("habit")).unwrap();
        assert_eq!(response.task_type, TaskType::Habit);
        assert!(response.is_completed);
        assert!(response.plan_id.is_none());
    }

    #[test]
    fn test_task_response_rejects_unknown_type() {
        assert!(matches!(
            task_response(record("meditation")),
            Err(ApiError::Internal(_))
        ));
    }
}
