//! Calorie and macro target service
//!
//! Thin async wrapper around the shared calculator. Every endpoint that needs
//! targets goes through here so the numbers are computed one way only.

use crate::error::ApiError;
use crate::repositories::ProfileRepository;
use crate::services::profile::{on_profile_column, profile_column, target_input};
use fitness_planner_shared::{
    compute_macro_targets, energy_breakdown, MacroTargets, TargetBreakdownResponse, TargetInput,
    ValidationError, ViolationKind,
};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Target service
pub struct TargetService;

impl TargetService {
    /// Compute targets for a caller-supplied profile
    pub fn compute(input: &TargetInput) -> Result<MacroTargets, ApiError> {
        let (profile, goal) = input.parse()?;
        Ok(compute_macro_targets(&profile, goal)?)
    }

    /// Targets plus the intermediate energy values
    pub fn breakdown(input: &TargetInput) -> Result<TargetBreakdownResponse, ApiError> {
        let (profile, goal) = input.parse()?;
        let targets = compute_macro_targets(&profile, goal)?;

        Ok(TargetBreakdownResponse {
            targets,
            energy: energy_breakdown(&profile, goal),
            profile,
            goal,
        })
    }

    /// Compute targets from the user's stored profile.
    ///
    /// Missing profile fields yield [`ApiError::ProfileIncomplete`], which
    /// also reports any invalid values; a profile with only invalid values
    /// yields a validation error.
    pub async fn for_user(db: &PgPool, user_id: Uuid) -> Result<TargetBreakdownResponse, ApiError> {
        let record = ProfileRepository::find(db, user_id).await?;
        let input = record.as_ref().map(target_input).unwrap_or_default();

        let breakdown = Self::breakdown(&input).map_err(stored_profile_error)?;

        debug!(
            user_id = %user_id,
            calories = breakdown.targets.calories,
            goal = %breakdown.goal,
            "Computed targets from stored profile"
        );

        Ok(breakdown)
    }
}

/// Re-express a validation failure on stored data in profile column terms
pub(crate) fn stored_profile_error(err: ApiError) -> ApiError {
    match err {
        ApiError::Validation(validation) => incomplete_or_invalid(validation),
        other => other,
    }
}

fn incomplete_or_invalid(err: ValidationError) -> ApiError {
    let missing: Vec<String> = err
        .missing()
        .map(|v| profile_column(&v.field).to_string())
        .collect();

    if missing.is_empty() {
        return ApiError::Validation(err);
    }

    let invalid = err
        .violations
        .iter()
        .filter(|v| v.kind != ViolationKind::Missing)
        .map(on_profile_column)
        .collect();

    ApiError::ProfileIncomplete {
        missing_fields: missing,
        invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitness_planner_shared::UnsafeTarget;

    fn reference_input() -> TargetInput {
        TargetInput {
            goal: Some("maintain_weight".to_string()),
            weight: Some(80.0),
            height: Some(180.0),
            age: Some(30.0),
            gender: Some("male".to_string()),
            activity_level: Some("moderate".to_string()),
        }
    }

    #[test]
    fn test_compute_reference_targets() {
        let targets = TargetService::compute(&reference_input()).unwrap();
        assert_eq!(targets.calories, 2759);
        assert_eq!(targets.carbs_grams, 389);
    }

    #[test]
    fn test_breakdown_carries_energy_values() {
        let breakdown = TargetService::breakdown(&reference_input()).unwrap();
        assert_eq!(breakdown.energy.bmr, 1780.0);
        assert_eq!(breakdown.energy.tdee, 2759.0);
        assert_eq!(breakdown.targets.protein_grams, 128);
    }

    #[test]
    fn test_invalid_input_is_validation_error() {
        let input = TargetInput {
            gender: Some("other".to_string()),
            ..reference_input()
        };
        let err = TargetService::compute(&input).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref e) if e.has_field("gender")));
    }

    #[test]
    fn test_unsafe_input_is_unsafe_target() {
        let input = TargetInput {
            goal: Some("lose_weight".to_string()),
            weight: Some(45.0),
            height: Some(150.0),
            age: Some(70.0),
            gender: Some("female".to_string()),
            activity_level: Some("sedentary".to_string()),
        };
        let err = TargetService::compute(&input).unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnsafeTarget(UnsafeTarget::BelowCalorieFloor { .. })
        ));
    }

    #[test]
    fn test_missing_stored_fields_become_profile_incomplete() {
        let input = TargetInput {
            weight: None,
            height: None,
            ..reference_input()
        };
        let err = stored_profile_error(TargetService::compute(&input).unwrap_err());
        match err {
            ApiError::ProfileIncomplete {
                missing_fields,
                invalid,
            } => {
                assert_eq!(missing_fields, vec!["current_weight", "height_cm"]);
                assert!(invalid.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_stored_fields_stay_validation_errors() {
        let input = TargetInput {
            age: Some(7.0),
            ..reference_input()
        };
        let err = stored_profile_error(TargetService::compute(&input).unwrap_err());
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_invalid_stored_fields_survive_alongside_missing_ones() {
        let input = TargetInput {
            weight: None,
            age: Some(7.0),
            ..reference_input()
        };
        let err = stored_profile_error(TargetService::compute(&input).unwrap_err());
        match err {
            ApiError::ProfileIncomplete {
                missing_fields,
                invalid,
            } => {
                assert_eq!(missing_fields, vec!["current_weight"]);
                assert_eq!(invalid.len(), 1);
                assert_eq!(invalid[0].field, "age");
                assert_eq!(invalid[0].kind, ViolationKind::OutOfRange);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
