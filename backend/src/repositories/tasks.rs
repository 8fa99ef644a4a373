//! Daily task repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Daily task record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub task_type: String,
    pub title: String,
    pub target_date: NaiveDate,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for creating a task
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub task_type: String,
    pub title: String,
    pub target_date: NaiveDate,
}

/// Task repository for database operations
pub struct TaskRepository;

impl TaskRepository {
    /// Insert tasks in one statement. Returns the number of rows written.
    pub async fn create_many(pool: &PgPool, tasks: &[CreateTask]) -> Result<u64> {
        if tasks.is_empty() {
            return Ok(0);
        }

        let user_ids: Vec<Uuid> = tasks.iter().map(|t| t.user_id).collect();
        let plan_ids: Vec<Uuid> = tasks.iter().map(|t| t.plan_id).collect();
        let task_types: Vec<String> = tasks.iter().map(|t| t.task_type.clone()).collect();
        let titles: Vec<String> = tasks.iter().map(|t| t.title.clone()).collect();
        let dates: Vec<NaiveDate> = tasks.iter().map(|t| t.target_date).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO user_daily_tasks (user_id, plan_id, task_type, title, target_date)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::text[], $5::date[])
            "#,
        )
        .bind(&user_ids)
        .bind(&plan_ids)
        .bind(&task_types)
        .bind(&titles)
        .bind(&dates)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Tasks scheduled for one day
    pub async fn list_for_date(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<Vec<TaskRecord>> {
        let records = sqlx::query_as::<_, TaskRecord>(
            r#"
            SELECT id, user_id, plan_id, task_type, title, target_date, is_completed, completed_at
            FROM user_daily_tasks
            WHERE user_id = $1 AND target_date = $2
            ORDER BY created_at, title
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Set or clear completion. `completed_at` follows the flag.
    pub async fn set_completed(
        pool: &PgPool,
        user_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<Option<TaskRecord>> {
        let record = sqlx::query_as::<_, TaskRecord>(
            r#"
            UPDATE user_daily_tasks
            SET is_completed = $3,
                completed_at = CASE WHEN $3 THEN NOW() ELSE NULL END
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, plan_id, task_type, title, target_date, is_completed, completed_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
