//! Fitness Planner WASM Module
//!
//! Browser bindings for the target calculator, so the client can preview
//! calorie and macro targets with exactly the numbers the server computes.

use fitness_planner_shared::{
    compute_macro_targets, energy_breakdown, validation::get_field_display_label,
    TargetBreakdownResponse, TargetError, TargetInput,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Error payload handed back to JavaScript
#[derive(Debug, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
enum CalculatorError {
    ValidationError { violations: serde_json::Value },
    UnsafeTarget { details: serde_json::Value },
}

impl From<TargetError> for CalculatorError {
    fn from(err: TargetError) -> Self {
        match err {
            TargetError::Validation(e) => CalculatorError::ValidationError {
                violations: serde_json::to_value(e.violations).unwrap_or_default(),
            },
            TargetError::Unsafe(e) => CalculatorError::UnsafeTarget {
                details: serde_json::to_value(e).unwrap_or_default(),
            },
        }
    }
}

/// Compute targets and return the breakdown as JSON, or an error payload as JSON
pub fn macro_targets_json(input: &TargetInput) -> Result<String, String> {
    let to_json = |err: CalculatorError| serde_json::to_string(&err).unwrap_or_default();

    let (profile, goal) = input
        .parse()
        .map_err(|e| to_json(TargetError::Validation(e).into()))?;
    let targets = compute_macro_targets(&profile, goal).map_err(|e| to_json(e.into()))?;

    let breakdown = TargetBreakdownResponse {
        targets,
        energy: energy_breakdown(&profile, goal),
        profile,
        goal,
    };
    serde_json::to_string(&breakdown).map_err(|e| e.to_string())
}

/// Calculate daily calorie and macro targets
///
/// Returns the breakdown JSON; throws with an error JSON string on invalid
/// input or an unsafe result.
#[wasm_bindgen]
pub fn calculate_macro_targets(
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    gender: &str,
    activity_level: &str,
    goal: &str,
) -> Result<String, JsError> {
    let input = TargetInput {
        goal: Some(goal.to_string()),
        weight: Some(weight_kg),
        height: Some(height_cm),
        age: Some(age_years),
        gender: Some(gender.to_string()),
        activity_level: Some(activity_level.to_string()),
    };
    macro_targets_json(&input).map_err(|e| JsError::new(&e))
}

/// User-facing label for a profile or calculator field
#[wasm_bindgen]
pub fn field_label(field: &str) -> String {
    get_field_display_label(field).to_string()
}
