//! Input validation functions
//!
//! Range checks for biometric fields and the boundary parser that turns the
//! loosely-typed [`TargetInput`] into a strict [`UserProfile`] and [`Goal`].
//! Missing values are reported, never replaced with defaults.

use crate::errors::{FieldViolation, ValidationError, ViolationKind};
use crate::health_metrics::{ActivityLevel, Gender, UserProfile};
use crate::nutrition::Goal;
use crate::types::TargetInput;

// ============================================================================
// Field names and ranges
// ============================================================================

pub const FIELD_WEIGHT: &str = "weight";
pub const FIELD_HEIGHT: &str = "height";
pub const FIELD_AGE: &str = "age";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_ACTIVITY_LEVEL: &str = "activityLevel";
pub const FIELD_GOAL: &str = "goal";

/// Inclusive weight bounds in kg
pub const MIN_WEIGHT_KG: f64 = 20.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;

/// Inclusive height bounds in cm
pub const MIN_HEIGHT_CM: f64 = 50.0;
pub const MAX_HEIGHT_CM: f64 = 300.0;

/// Inclusive age bounds in whole years
pub const MIN_AGE_YEARS: u32 = 13;
pub const MAX_AGE_YEARS: u32 = 150;

fn check_range(field: &str, value: f64, min: f64, max: f64, unit: &str) -> Result<(), FieldViolation> {
    if value.is_nan() || value.is_infinite() {
        return Err(FieldViolation::new(
            field,
            ViolationKind::NotANumber,
            "must be a valid number",
        ));
    }
    if value < min || value > max {
        return Err(FieldViolation::new(
            field,
            ViolationKind::OutOfRange,
            format!("must be between {} and {} {}", min, max, unit),
        ));
    }
    Ok(())
}

pub(crate) fn not_allowed(field: &str, allowed: &[&str]) -> FieldViolation {
    FieldViolation::new(
        field,
        ViolationKind::NotAllowed,
        format!("must be one of: {}", allowed.join(", ")),
    )
}

/// Validate weight value (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), FieldViolation> {
    check_range(FIELD_WEIGHT, weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG, "kg")
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), FieldViolation> {
    check_range(FIELD_HEIGHT, height_cm, MIN_HEIGHT_CM, MAX_HEIGHT_CM, "cm")
}

/// Validate age in whole years
pub fn validate_age_years(age_years: u32) -> Result<(), FieldViolation> {
    check_range(
        FIELD_AGE,
        f64::from(age_years),
        f64::from(MIN_AGE_YEARS),
        f64::from(MAX_AGE_YEARS),
        "years",
    )
}

/// Validate gender literal
pub fn validate_gender(gender: &str) -> Result<(), FieldViolation> {
    gender.parse::<Gender>().map(|_| ())
}

/// Validate activity level literal
pub fn validate_activity_level(level: &str) -> Result<(), FieldViolation> {
    level.parse::<ActivityLevel>().map(|_| ())
}

/// Validate goal literal
pub fn validate_goal(goal: &str) -> Result<(), FieldViolation> {
    goal.parse::<Goal>().map(|_| ())
}

// ============================================================================
// Boundary parsing
// ============================================================================

fn parse_weight_kg(value: Option<f64>) -> Result<f64, FieldViolation> {
    let weight = value.ok_or_else(|| FieldViolation::missing(FIELD_WEIGHT))?;
    validate_weight_kg(weight)?;
    Ok(weight)
}

fn parse_height_cm(value: Option<f64>) -> Result<f64, FieldViolation> {
    let height = value.ok_or_else(|| FieldViolation::missing(FIELD_HEIGHT))?;
    validate_height_cm(height)?;
    Ok(height)
}

fn parse_age_years(value: Option<f64>) -> Result<u32, FieldViolation> {
    let age = value.ok_or_else(|| FieldViolation::missing(FIELD_AGE))?;
    check_range(
        FIELD_AGE,
        age,
        f64::from(MIN_AGE_YEARS),
        f64::from(MAX_AGE_YEARS),
        "years",
    )?;
    if age.fract() != 0.0 {
        return Err(FieldViolation::new(
            FIELD_AGE,
            ViolationKind::NotWhole,
            "must be a whole number of years",
        ));
    }
    Ok(age as u32)
}

fn parse_literal<T>(field: &str, value: Option<&str>) -> Result<T, FieldViolation>
where
    T: std::str::FromStr<Err = FieldViolation>,
{
    match value {
        Some(s) if !s.trim().is_empty() => s.parse(),
        _ => Err(FieldViolation::missing(field)),
    }
}

impl TargetInput {
    /// Parse into a strict profile and goal.
    ///
    /// Every field is checked; the error lists all violations at once.
    pub fn parse(&self) -> Result<(UserProfile, Goal), ValidationError> {
        let weight = parse_weight_kg(self.weight);
        let height = parse_height_cm(self.height);
        let age = parse_age_years(self.age);
        let gender = parse_literal::<Gender>(FIELD_GENDER, self.gender.as_deref());
        let activity = parse_literal::<ActivityLevel>(FIELD_ACTIVITY_LEVEL, self.activity_level.as_deref());
        let goal = parse_literal::<Goal>(FIELD_GOAL, self.goal.as_deref());

        match (weight, height, age, gender, activity, goal) {
            (Ok(weight_kg), Ok(height_cm), Ok(age_years), Ok(gender), Ok(activity_level), Ok(goal)) => {
                let profile = UserProfile {
                    weight_kg,
                    height_cm,
                    age_years,
                    gender,
                    activity_level,
                };
                Ok((profile, goal))
            }
            (weight, height, age, gender, activity, goal) => Err(ValidationError::new(
                [
                    weight.err(),
                    height.err(),
                    age.err(),
                    gender.err(),
                    activity.err(),
                    goal.err(),
                ]
                .into_iter()
                .flatten()
                .collect(),
            )),
        }
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" | "current_weight" => "Current Weight",
        "height" | "height_cm" => "Height",
        "age" => "Age",
        "gender" => "Gender",
        "activityLevel" | "activity_level" => "Activity Level",
        "goal" | "fitness_goal" => "Fitness Goal",
        "target_weight" => "Target Weight",
        "plan_type" | "planType" => "Plan Type",
        _ => field_name,
    }
}

/// Convert a list of technical field names to user-friendly labels
pub fn get_missing_fields_labels(fields: &[String]) -> Vec<String> {
    fields
        .iter()
        .map(|f| get_field_display_label(f).to_string())
        .collect()
}
