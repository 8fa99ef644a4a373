//! Error types for the target calculator and its input boundary

use crate::validation::get_field_display_label;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong with a single input field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Field absent or null
    Missing,
    /// NaN or infinite
    NotANumber,
    /// Fractional value where whole units are required
    NotWhole,
    /// Outside the accepted realistic range
    OutOfRange,
    /// Not one of the enumerated literals
    NotAllowed,
    /// JSON value of the wrong type, or an unreadable body
    WrongType,
}

/// A violated constraint on one named field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub display_label: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            display_label: get_field_display_label(field).to_string(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, ViolationKind::Missing, "is required")
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Input failed one or more range/enum constraints.
///
/// Always carries every violation found, not just the first, so a caller can
/// point the user at each field that needs fixing.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("validation failed: {}", join_messages(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(violation: FieldViolation) -> Self {
        Self::new(vec![violation])
    }

    /// Technical names of the offending fields, in input order
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Violations where the value was absent rather than wrong
    pub fn missing(&self) -> impl Iterator<Item = &FieldViolation> {
        self.violations
            .iter()
            .filter(|v| v.kind == ViolationKind::Missing)
    }
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(FieldViolation::user_message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The computed target is not safe to hand to a user
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnsafeTarget {
    #[error("daily target of {calories} kcal is below the safe floor of {floor} kcal")]
    BelowCalorieFloor { calories: i64, floor: u32 },

    #[error(
        "protein ({protein_grams} g) and fat ({fat_grams} g) leave no room for carbohydrates within {calories} kcal"
    )]
    MacroBudgetExceeded {
        calories: u32,
        protein_grams: u32,
        fat_grams: u32,
    },
}

/// Failure modes of the target calculator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TargetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("target unsafe for given inputs: {0}")]
    Unsafe(#[from] UnsafeTarget),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = ValidationError::new(vec![
            FieldViolation::missing("weight"),
            FieldViolation::new("gender", ViolationKind::NotAllowed, "must be one of: male, female"),
        ]);

        assert_eq!(err.fields(), vec!["weight", "gender"]);
        assert!(err.has_field("gender"));
        assert!(!err.has_field("age"));
        assert_eq!(err.missing().count(), 1);

        let message = err.to_string();
        assert!(message.contains("Current Weight: is required"));
        assert!(message.contains("Gender: must be one of"));
    }

    #[test]
    fn test_unsafe_target_serializes_with_reason_tag() {
        let unsafe_target = UnsafeTarget::BelowCalorieFloor {
            calories: 1100,
            floor: 1200,
        };
        let json = serde_json::to_value(&unsafe_target).unwrap();
        assert_eq!(json["reason"], "below_calorie_floor");
        assert_eq!(json["calories"], 1100);
    }

    #[test]
    fn test_target_error_from_conversions() {
        let err: TargetError = ValidationError::single(FieldViolation::missing("age")).into();
        assert!(matches!(err, TargetError::Validation(_)));

        let err: TargetError = UnsafeTarget::BelowCalorieFloor {
            calories: 900,
            floor: 1200,
        }
        .into();
        assert!(err.to_string().starts_with("target unsafe for given inputs"));
    }
}
