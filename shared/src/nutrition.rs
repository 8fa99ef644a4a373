//! Daily calorie and macronutrient target calculator
//!
//! Turns a validated [`UserProfile`] and a [`Goal`] into [`MacroTargets`]:
//!
//! 1. BMR (Mifflin-St Jeor)
//! 2. TDEE = BMR × activity multiplier
//! 3. target = TDEE + goal adjustment (fixed kcal delta)
//! 4. protein = round(weight × 1.6)
//! 5. fat = round(target × 0.25 / 9)
//! 6. carbs = round((target - protein × 4 - fat × 9) / 4)
//!
//! All rounding is [`f64::round`], i.e. half away from zero. Targets below
//! [`MIN_SAFE_CALORIES`] are refused rather than clamped.

use crate::errors::{FieldViolation, TargetError, UnsafeTarget};
use crate::health_metrics::{calculate_bmr, ActivityLevel, UserProfile};
use crate::validation::{not_allowed, FIELD_GOAL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Protein allocation per kg of body weight, independent of goal
pub const PROTEIN_GRAMS_PER_KG: f64 = 1.6;

/// Share of total calories allocated to fat
pub const FAT_CALORIE_SHARE: f64 = 0.25;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Lowest daily target the calculator will hand out
pub const MIN_SAFE_CALORIES: u32 = 1200;

// ============================================================================
// Goal
// ============================================================================

/// The user's stated objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    MaintainWeight,
    GainWeight,
    GainMuscle,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::LoseWeight,
        Goal::MaintainWeight,
        Goal::GainWeight,
        Goal::GainMuscle,
    ];

    /// Fixed daily kcal delta applied on top of TDEE
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            Goal::LoseWeight => -500.0,
            Goal::MaintainWeight => 0.0,
            Goal::GainWeight => 500.0,
            Goal::GainMuscle => 250.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::MaintainWeight => "maintain_weight",
            Goal::GainWeight => "gain_weight",
            Goal::GainMuscle => "gain_muscle",
        }
    }

    /// Short phrase for prompts and UI copy
    pub fn description(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "weight loss (caloric deficit)",
            Goal::MaintainWeight => "weight maintenance",
            Goal::GainWeight => "weight gain (caloric surplus)",
            Goal::GainMuscle => "muscle gain (slight caloric surplus)",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = FieldViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Goal::ALL
            .into_iter()
            .find(|goal| goal.as_str() == normalized)
            .ok_or_else(|| not_allowed(FIELD_GOAL, &Goal::ALL.map(|g| g.as_str())))
    }
}

// ============================================================================
// Targets
// ============================================================================

/// Daily calorie and macronutrient targets.
///
/// Serialized as `{ calories, protein, carbs, fat }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: u32,
    #[serde(rename = "protein")]
    pub protein_grams: u32,
    #[serde(rename = "carbs")]
    pub carbs_grams: u32,
    #[serde(rename = "fat")]
    pub fat_grams: u32,
}

impl MacroTargets {
    /// Calories implied by the gram targets
    pub fn macro_calories(&self) -> u32 {
        self.protein_grams * KCAL_PER_GRAM_PROTEIN as u32
            + self.carbs_grams * KCAL_PER_GRAM_CARBS as u32
            + self.fat_grams * KCAL_PER_GRAM_FAT as u32
    }

    /// Signed gap between the stated calories and the macro sum
    pub fn calorie_discrepancy(&self) -> i64 {
        i64::from(self.calories) - i64::from(self.macro_calories())
    }
}

/// Unrounded intermediate values of a target computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    pub bmr: f64,
    pub activity_multiplier: f64,
    pub tdee: f64,
    pub goal_adjustment: f64,
    pub target_calories: f64,
}

/// Steps 1-3 of the calculator
pub fn energy_breakdown(profile: &UserProfile, goal: Goal) -> EnergyBreakdown {
    let bmr = calculate_bmr(profile);
    let activity_multiplier = profile.activity_level().multiplier();
    let tdee = bmr * activity_multiplier;
    let goal_adjustment = goal.calorie_adjustment();

    EnergyBreakdown {
        bmr,
        activity_multiplier,
        tdee,
        goal_adjustment,
        target_calories: tdee + goal_adjustment,
    }
}

/// Compute daily calorie and macro targets.
///
/// Pure and deterministic. Fails with [`UnsafeTarget`] when the goal-adjusted
/// target rounds below [`MIN_SAFE_CALORIES`] or when protein and fat alone
/// exceed it.
pub fn compute_macro_targets(profile: &UserProfile, goal: Goal) -> Result<MacroTargets, TargetError> {
    let target = energy_breakdown(profile, goal).target_calories;

    let calories = target.round();
    if calories < f64::from(MIN_SAFE_CALORIES) {
        return Err(UnsafeTarget::BelowCalorieFloor {
            calories: calories as i64,
            floor: MIN_SAFE_CALORIES,
        }
        .into());
    }

    let protein = (profile.weight_kg() * PROTEIN_GRAMS_PER_KG).round();
    let fat = (target * FAT_CALORIE_SHARE / KCAL_PER_GRAM_FAT).round();
    let carbs = ((target - protein * KCAL_PER_GRAM_PROTEIN - fat * KCAL_PER_GRAM_FAT)
        / KCAL_PER_GRAM_CARBS)
        .round();

    if carbs < 0.0 {
        return Err(UnsafeTarget::MacroBudgetExceeded {
            calories: calories as u32,
            protein_grams: protein as u32,
            fat_grams: fat as u32,
        }
        .into());
    }

    Ok(MacroTargets {
        calories: calories as u32,
        protein_grams: protein as u32,
        carbs_grams: carbs as u32,
        fat_grams: fat as u32,
    })
}

/// Targets for every activity level, least to most active.
///
/// Levels whose target is unsafe are skipped.
pub fn targets_by_activity(profile: &UserProfile, goal: Goal) -> Vec<(ActivityLevel, MacroTargets)> {
    ActivityLevel::ALL
        .into_iter()
        .filter_map(|level| {
            compute_macro_targets(&profile.with_activity_level(level), goal)
                .ok()
                .map(|targets| (level, targets))
        })
        .collect()
}
