//! Plan and task domain models

use crate::errors::FieldViolation;
use crate::validation::not_allowed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FIELD_PLAN_TYPE: &str = "plan_type";

/// Number of days of daily tasks created alongside a new plan
pub const PLAN_TASK_DAYS: i64 = 7;

/// Description stored when the generated plan has none
pub const DEFAULT_PLAN_DESCRIPTION: &str = "AI-generated personalized plan";

/// Used when the generated plan carries no daily task list
pub const FALLBACK_DAILY_TASKS: [&str; 2] = ["Follow your plan", "Track progress"];

/// Kind of AI-generated plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Workout,
    Nutrition,
    Combined,
}

impl PlanType {
    pub const ALL: [PlanType; 3] = [PlanType::Workout, PlanType::Nutrition, PlanType::Combined];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Workout => "workout",
            PlanType::Nutrition => "nutrition",
            PlanType::Combined => "combined",
        }
    }

    /// Whether the prompt for this plan embeds calorie and macro targets
    pub fn needs_targets(&self) -> bool {
        matches!(self, PlanType::Nutrition | PlanType::Combined)
    }

    /// Key in the generated JSON holding the daily task titles
    pub fn daily_tasks_key(&self) -> &'static str {
        match self {
            PlanType::Combined => "combinedDailyTasks",
            PlanType::Workout | PlanType::Nutrition => "dailyTasks",
        }
    }

    /// Title used when the generated plan has none
    pub fn default_title(&self) -> &'static str {
        match self {
            PlanType::Workout => "Workout Plan",
            PlanType::Nutrition => "Nutrition Plan",
            PlanType::Combined => "Combined Plan",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = FieldViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workout" => Ok(PlanType::Workout),
            "nutrition" => Ok(PlanType::Nutrition),
            "combined" => Ok(PlanType::Combined),
            _ => Err(not_allowed(
                FIELD_PLAN_TYPE,
                &PlanType::ALL.map(|p| p.as_str()),
            )),
        }
    }
}

/// Category of a daily task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Workout,
    Nutrition,
    Habit,
}

impl TaskType {
    /// Tasks from combined plans are tracked as habits
    pub fn for_plan(plan_type: PlanType) -> Self {
        match plan_type {
            PlanType::Workout => TaskType::Workout,
            PlanType::Nutrition => TaskType::Nutrition,
            PlanType::Combined => TaskType::Habit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Workout => "workout",
            TaskType::Nutrition => "nutrition",
            TaskType::Habit => "habit",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workout" => Ok(TaskType::Workout),
            "nutrition" => Ok(TaskType::Nutrition),
            "habit" => Ok(TaskType::Habit),
            other => Err(format!("unknown task type: {}", other)),
        }
    }
}
