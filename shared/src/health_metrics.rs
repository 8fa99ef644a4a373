//! Energy expenditure calculations
//!
//! Biometric profile types and the BMR/TDEE steps of the target calculator.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **One Formula**: Mifflin-St Jeor is the only BMR equation in the workspace
//! 3. **Validated Input**: A [`UserProfile`] cannot exist with out-of-range fields
//! 4. **Type Safety**: Strong typing prevents unit confusion

use crate::errors::{FieldViolation, ValidationError};
use crate::validation::{
    validate_age_years, validate_height_cm, validate_weight_kg, FIELD_ACTIVITY_LEVEL,
    FIELD_GENDER,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// User Profile Types
// ============================================================================

/// Biological sex as used by the BMR equation.
/// Only the two constants of the published formula are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Constant term of the Mifflin-St Jeor equation
    pub fn bmr_constant(&self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = FieldViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(crate::validation::not_allowed(
                FIELD_GENDER,
                &Gender::ALL.map(|g| g.as_str()),
            )),
        }
    }
}

/// Self-reported activity level, ordered from least to most active
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise, physical job
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Hard exercise 6-7 days/week",
            ActivityLevel::VeryActive => "Very hard exercise or physical job",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = FieldViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| {
                crate::validation::not_allowed(
                    FIELD_ACTIVITY_LEVEL,
                    &ActivityLevel::ALL.map(|l| l.as_str()),
                )
            })
    }
}

/// Validated biometric profile.
///
/// Fields are private so the only ways in are [`UserProfile::new`] and the
/// boundary parser in [`crate::validation`], both of which enforce the ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserProfile {
    pub(crate) weight_kg: f64,
    pub(crate) height_cm: f64,
    pub(crate) age_years: u32,
    pub(crate) gender: Gender,
    pub(crate) activity_level: ActivityLevel,
}

impl UserProfile {
    /// Build a profile, rejecting any field outside its realistic range
    pub fn new(
        weight_kg: f64,
        height_cm: f64,
        age_years: u32,
        gender: Gender,
        activity_level: ActivityLevel,
    ) -> Result<Self, ValidationError> {
        let violations: Vec<FieldViolation> = [
            validate_weight_kg(weight_kg).err(),
            validate_height_cm(height_cm).err(),
            validate_age_years(age_years).err(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        Ok(Self {
            weight_kg,
            height_cm,
            age_years,
            gender,
            activity_level,
        })
    }

    #[inline]
    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    #[inline]
    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    #[inline]
    pub fn age_years(&self) -> u32 {
        self.age_years
    }

    #[inline]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    #[inline]
    pub fn activity_level(&self) -> ActivityLevel {
        self.activity_level
    }

    /// Same profile at a different activity level
    pub fn with_activity_level(self, activity_level: ActivityLevel) -> Self {
        Self {
            activity_level,
            ..self
        }
    }
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr(profile: &UserProfile) -> f64 {
    10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age_years)
        + profile.gender.bmr_constant()
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(profile: &UserProfile) -> f64 {
    calculate_bmr(profile) * profile.activity_level.multiplier()
}
