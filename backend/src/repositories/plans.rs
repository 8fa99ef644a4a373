//! AI plan repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// Plan record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_type: String,
    pub title: String,
    pub description: Option<String>,
    pub plan_data: Value,
    pub targets: Option<Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for storing a generated plan
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub user_id: Uuid,
    pub plan_type: String,
    pub title: String,
    pub description: Option<String>,
    pub plan_data: Value,
    pub targets: Option<Value>,
}

/// Plan repository for database operations
pub struct PlanRepository;

impl PlanRepository {
    /// Store a new active plan
    pub async fn create(pool: &PgPool, input: CreatePlan) -> Result<PlanRecord> {
        let record = sqlx::query_as::<_, PlanRecord>(
            r#"
            INSERT INTO user_ai_plans (user_id, plan_type, title, description, plan_data, targets, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING id, user_id, plan_type, title, description, plan_data, targets, is_active, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.plan_type)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.plan_data)
        .bind(&input.targets)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Active plans for a user, newest first
    pub async fn list_active(pool: &PgPool, user_id: Uuid) -> Result<Vec<PlanRecord>> {
        let records = sqlx::query_as::<_, PlanRecord>(
            r#"
            SELECT id, user_id, plan_type, title, description, plan_data, targets, is_active, created_at
            FROM user_ai_plans
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Mark a plan inactive. Returns false if the user has no such active plan.
    pub async fn deactivate(pool: &PgPool, user_id: Uuid, plan_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE user_ai_plans
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
