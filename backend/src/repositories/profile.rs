//! Profile repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Profile record from database. Every biometric column may be null.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub height_cm: Option<Decimal>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub current_weight: Option<Decimal>,
    pub target_weight: Option<Decimal>,
    pub fitness_goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn height_cm_f64(&self) -> Option<f64> {
        self.height_cm.and_then(|d| d.to_f64())
    }

    pub fn current_weight_f64(&self) -> Option<f64> {
        self.current_weight.and_then(|d| d.to_f64())
    }

    pub fn target_weight_f64(&self) -> Option<f64> {
        self.target_weight.and_then(|d| d.to_f64())
    }
}

/// Partial profile update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub height_cm: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub fitness_goal: Option<String>,
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

const PROFILE_COLUMNS: &str = "id, full_name, height_cm, age, gender, activity_level, \
     current_weight, target_weight, fitness_goal, created_at, updated_at";

/// Profile repository for database operations
pub struct ProfileRepository;

impl ProfileRepository {
    /// Find a user's profile
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Create the profile if absent, otherwise merge in the provided fields
    pub async fn upsert(pool: &PgPool, user_id: Uuid, input: UpdateProfile) -> Result<ProfileRecord> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            r#"
            INSERT INTO profiles (id, full_name, height_cm, age, gender, activity_level,
                                  current_weight, target_weight, fitness_goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                full_name = COALESCE(EXCLUDED.full_name, profiles.full_name),
                height_cm = COALESCE(EXCLUDED.height_cm, profiles.height_cm),
                age = COALESCE(EXCLUDED.age, profiles.age),
                gender = COALESCE(EXCLUDED.gender, profiles.gender),
                activity_level = COALESCE(EXCLUDED.activity_level, profiles.activity_level),
                current_weight = COALESCE(EXCLUDED.current_weight, profiles.current_weight),
                target_weight = COALESCE(EXCLUDED.target_weight, profiles.target_weight),
                fitness_goal = COALESCE(EXCLUDED.fitness_goal, profiles.fitness_goal),
                updated_at = NOW()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(&input.full_name)
        .bind(to_decimal(input.height_cm))
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.activity_level)
        .bind(to_decimal(input.current_weight))
        .bind(to_decimal(input.target_weight))
        .bind(&input.fitness_goal)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
