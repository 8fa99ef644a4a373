//! API request and response types

use crate::health_metrics::UserProfile;
use crate::models::{PlanType, TaskType};
use crate::nutrition::{EnergyBreakdown, Goal, MacroTargets};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Common Types
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Target Types
// ============================================================================

/// Loosely-typed calculator input as it arrives over the wire.
///
/// Every field is optional so that absent values are reported as missing by
/// [`TargetInput::parse`] instead of failing deserialization wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInput {
    #[serde(default)]
    pub goal: Option<String>,
    /// Body weight in kg
    #[serde(default)]
    pub weight: Option<f64>,
    /// Height in cm
    #[serde(default)]
    pub height: Option<f64>,
    /// Age in whole years
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, alias = "activity_level")]
    pub activity_level: Option<String>,
}

/// Targets together with the values they were derived from
#[derive(Debug, Clone, Serialize)]
pub struct TargetBreakdownResponse {
    pub targets: MacroTargets,
    pub energy: EnergyBreakdown,
    pub profile: UserProfile,
    pub goal: Goal,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Stored profile as returned to the client.
///
/// Fields stay optional: a partially filled profile is a normal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_goal: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Height in cm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Age in whole years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    /// male or female
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// sedentary, light, moderate, active, very_active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    /// Current weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    /// Target weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    /// lose_weight, maintain_weight, gain_weight, gain_muscle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_goal: Option<String>,
}

/// Which profile fields still block target computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCompletionResponse {
    pub complete: bool,
    pub missing_fields: Vec<String>,
    /// User-facing labels for `missing_fields`, same order
    pub missing_labels: Vec<String>,
    /// Columns holding a value the calculator rejects
    pub invalid_fields: Vec<String>,
}

// ============================================================================
// Plan Types
// ============================================================================

/// Plan generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    /// workout, nutrition or combined
    #[serde(alias = "planType")]
    pub plan_type: String,
}

/// Stored AI plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub plan_type: PlanType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub plan_data: serde_json::Value,
    /// Targets the plan was generated against; may be stale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<MacroTargets>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Plan generation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    pub plan: PlanResponse,
    pub tasks_created: usize,
}

// ============================================================================
// Task Types
// ============================================================================

/// A task scheduled for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTaskResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<Uuid>,
    pub task_type: TaskType,
    pub title: String,
    pub target_date: NaiveDate,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Mark a task done or undone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub completed: bool,
}

/// Query parameters for listing tasks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

// ============================================================================
// Meal Types
// ============================================================================

/// One suggested food item. Values are estimates from the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// Day totals as reported by the generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// Generated one-day meal plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default)]
    pub breakfast: Vec<MealItem>,
    #[serde(default)]
    pub lunch: Vec<MealItem>,
    #[serde(default)]
    pub dinner: Vec<MealItem>,
    #[serde(default)]
    pub snacks: Vec<MealItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<MealSummary>,
}

impl MealPlan {
    pub fn is_empty(&self) -> bool {
        self.breakfast.is_empty()
            && self.lunch.is_empty()
            && self.dinner.is_empty()
            && self.snacks.is_empty()
    }

    /// Sum of the listed items, independent of the reported summary
    pub fn item_totals(&self) -> MealSummary {
        self.breakfast
            .iter()
            .chain(&self.lunch)
            .chain(&self.dinner)
            .chain(&self.snacks)
            .fold(MealSummary::default(), |acc, item| MealSummary {
                calories: acc.calories + item.calories,
                protein: acc.protein + item.protein,
                carbs: acc.carbs + item.carbs,
                fat: acc.fat + item.fat,
            })
    }
}

/// Meal recommendation response.
///
/// `targets` are computed locally and authoritative; `meal_plan` is a
/// best-effort approximation of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanResponse {
    pub targets: MacroTargets,
    pub meal_plan: MealPlan,
}
