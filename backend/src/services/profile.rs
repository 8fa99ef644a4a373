//! Profile service - business logic for user profile management

use crate::error::ApiError;
use crate::repositories::{ProfileRecord, ProfileRepository, UpdateProfile};
use fitness_planner_shared::types::{
    ProfileCompletionResponse, ProfileResponse, TargetInput, UpdateProfileRequest,
};
use fitness_planner_shared::validation::{
    get_field_display_label, get_missing_fields_labels, validate_age_years, validate_height_cm,
    validate_weight_kg, FIELD_ACTIVITY_LEVEL, FIELD_AGE, FIELD_GENDER, FIELD_GOAL, FIELD_HEIGHT,
    FIELD_WEIGHT,
};
use fitness_planner_shared::{
    ActivityLevel, FieldViolation, Gender, Goal, ValidationError, ViolationKind,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Map calculator input field names to profile columns
pub fn profile_column(field: &str) -> &str {
    match field {
        FIELD_WEIGHT => "current_weight",
        FIELD_HEIGHT => "height_cm",
        FIELD_AGE => "age",
        FIELD_GENDER => "gender",
        FIELD_ACTIVITY_LEVEL => "activity_level",
        FIELD_GOAL => "fitness_goal",
        other => other,
    }
}

/// Raw calculator input from a stored profile. Nothing is defaulted.
pub fn target_input(record: &ProfileRecord) -> TargetInput {
    TargetInput {
        goal: record.fitness_goal.clone(),
        weight: record.current_weight_f64(),
        height: record.height_cm_f64(),
        age: record.age.map(f64::from),
        gender: record.gender.clone(),
        activity_level: record.activity_level.clone(),
    }
}

pub(crate) fn profile_response(record: ProfileRecord) -> ProfileResponse {
    ProfileResponse {
        id: record.id,
        height_cm: record.height_cm_f64(),
        current_weight: record.current_weight_f64(),
        target_weight: record.target_weight_f64(),
        full_name: record.full_name,
        age: record.age,
        gender: record.gender,
        activity_level: record.activity_level,
        fitness_goal: record.fitness_goal,
        updated_at: record.updated_at,
    }
}

/// Re-express a calculator violation on the profile column it came from
pub(crate) fn on_profile_column(violation: &FieldViolation) -> FieldViolation {
    on_column(violation.clone(), profile_column(&violation.field))
}

/// Move a violation onto the profile column it was found in
fn on_column(violation: FieldViolation, column: &str) -> FieldViolation {
    FieldViolation {
        field: column.to_string(),
        display_label: get_field_display_label(column).to_string(),
        ..violation
    }
}

/// Profile service for user profile operations
pub struct ProfileService;

impl ProfileService {
    /// Get user profile
    pub async fn get_profile(db: &PgPool, user_id: Uuid) -> Result<ProfileResponse, ApiError> {
        let record = ProfileRepository::find(db, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

        Ok(profile_response(record))
    }

    /// Validate and persist a partial profile update.
    ///
    /// Enumerated values are stored in canonical form; nothing out of range is
    /// clamped or dropped.
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        let update = Self::validate_profile_update(req)?;

        let record = ProfileRepository::upsert(db, user_id, update).await?;
        info!(user_id = %user_id, "Profile updated");

        Ok(profile_response(record))
    }

    /// Report which fields still block target computation
    pub async fn completion(db: &PgPool, user_id: Uuid) -> Result<ProfileCompletionResponse, ApiError> {
        let record = ProfileRepository::find(db, user_id).await?;
        let input = record.as_ref().map(target_input).unwrap_or_default();
        Ok(Self::completion_for(&input))
    }

    fn completion_for(input: &TargetInput) -> ProfileCompletionResponse {
        let violations = input.parse().err().map(|e| e.violations).unwrap_or_default();

        let (missing, invalid): (Vec<_>, Vec<_>) = violations
            .iter()
            .partition(|v| v.kind == ViolationKind::Missing);
        let missing_fields: Vec<String> = missing
            .into_iter()
            .map(|v| profile_column(&v.field).to_string())
            .collect();
        let invalid_fields: Vec<String> = invalid
            .into_iter()
            .map(|v| profile_column(&v.field).to_string())
            .collect();

        ProfileCompletionResponse {
            complete: missing_fields.is_empty() && invalid_fields.is_empty(),
            missing_labels: get_missing_fields_labels(&missing_fields),
            missing_fields,
            invalid_fields,
        }
    }

    /// Validate profile update request
    fn validate_profile_update(req: UpdateProfileRequest) -> Result<UpdateProfile, ApiError> {
        let mut violations = Vec::new();

        if let Some(height) = req.height_cm {
            if let Err(v) = validate_height_cm(height) {
                violations.push(on_column(v, "height_cm"));
            }
        }

        for (column, weight) in [
            ("current_weight", req.current_weight),
            ("target_weight", req.target_weight),
        ] {
            if let Some(weight) = weight {
                if let Err(v) = validate_weight_kg(weight) {
                    violations.push(on_column(v, column));
                }
            }
        }

        if let Some(age) = req.age {
            let checked = u32::try_from(age)
                .map_err(|_| {
                    FieldViolation::new(FIELD_AGE, ViolationKind::OutOfRange, "must not be negative")
                })
                .and_then(validate_age_years);
            if let Err(v) = checked {
                violations.push(v);
            }
        }

        let gender = canonical::<Gender>(req.gender.as_deref(), "gender", &mut violations, Gender::as_str);
        let activity_level = canonical::<ActivityLevel>(
            req.activity_level.as_deref(),
            "activity_level",
            &mut violations,
            ActivityLevel::as_str,
        );
        let fitness_goal =
            canonical::<Goal>(req.fitness_goal.as_deref(), "fitness_goal", &mut violations, Goal::as_str);

        if !violations.is_empty() {
            return Err(ValidationError::new(violations).into());
        }

        Ok(UpdateProfile {
            full_name: req.full_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            height_cm: req.height_cm,
            age: req.age,
            gender,
            activity_level,
            current_weight: req.current_weight,
            target_weight: req.target_weight,
            fitness_goal,
        })
    }
}

/// Parse an optional enumerated value, recording a violation on `column`
fn canonical<T>(
    value: Option<&str>,
    column: &str,
    violations: &mut Vec<FieldViolation>,
    as_str: fn(&T) -> &'static str,
) -> Option<String>
where
    T: std::str::FromStr<Err = FieldViolation>,
{
    match value?.parse::<T>() {
        Ok(parsed) => Some(as_str(&parsed).to_string()),
        Err(v) => {
            violations.push(on_column(v, column));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn record() -> ProfileRecord {
        ProfileRecord {
            id: Uuid::new_v4(),
            full_name: Some("Sam Doe".to_string()),
            height_cm: Some(Decimal::new(1800, 1)),
            age: Some(30),
            gender: Some("male".to_string()),
            activity_level: Some("moderate".to_string()),
            current_weight: Some(Decimal::new(800, 1)),
            target_weight: None,
            fitness_goal: Some("maintain_weight".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_target_input_from_record() {
        let input = target_input(&record());
        assert_eq!(input.weight, Some(80.0));
        assert_eq!(input.height, Some(180.0));
        assert_eq!(input.age, Some(30.0));
        assert!(input.parse().is_ok());
    }

    #[test]
    fn test_completion_for_full_profile() {
        let completion = ProfileService::completion_for(&target_input(&record()));
        assert!(completion.complete);
        assert!(completion.missing_fields.is_empty());
    }

    #[test]
    fn test_completion_lists_profile_columns() {
        let mut partial = record();
        partial.height_cm = None;
        partial.fitness_goal = None;

        let completion = ProfileService::completion_for(&target_input(&partial));
        assert!(!completion.complete);
        assert_eq!(completion.missing_fields, vec!["height_cm", "fitness_goal"]);
        assert_eq!(completion.missing_labels, vec!["Height", "Fitness Goal"]);
    }

    #[test]
    fn test_empty_profile_is_incomplete_everywhere() {
        let completion = ProfileService::completion_for(&TargetInput::default());
        assert_eq!(completion.missing_fields.len(), 6);
        assert!(completion.invalid_fields.is_empty());
    }

    #[test]
    fn test_completion_separates_invalid_from_missing() {
        let mut stale = record();
        stale.current_weight = None;
        stale.age = Some(7);
        stale.gender = Some("other".to_string());

        let completion = ProfileService::completion_for(&target_input(&stale));
        assert!(!completion.complete);
        assert_eq!(completion.missing_fields, vec!["current_weight"]);
        assert_eq!(completion.missing_labels, vec!["Current Weight"]);
        assert_eq!(completion.invalid_fields, vec!["age", "gender"]);
    }

    #[test]
    fn test_completion_with_only_invalid_values_is_not_complete() {
        let mut stale = record();
        stale.age = Some(7);

        let completion = ProfileService::completion_for(&target_input(&stale));
        assert!(!completion.complete);
        assert!(completion.missing_fields.is_empty());
        assert_eq!(completion.invalid_fields, vec!["age"]);
    }

    #[test]
    fn test_update_canonicalizes_enums() {
        let update = ProfileService::validate_profile_update(UpdateProfileRequest {
            gender: Some("Female".to_string()),
            activity_level: Some(" very_active ".to_string()),
            fitness_goal: Some("GAIN_MUSCLE".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(update.gender.as_deref(), Some("female"));
        assert_eq!(update.activity_level.as_deref(), Some("very_active"));
        assert_eq!(update.fitness_goal.as_deref(), Some("gain_muscle"));
    }

    #[test]
    fn test_update_rejects_every_bad_field() {
        let err = ProfileService::validate_profile_update(UpdateProfileRequest {
            height_cm: Some(20.0),
            current_weight: Some(600.0),
            target_weight: Some(10.0),
            age: Some(-3),
            gender: Some("other".to_string()),
            fitness_goal: Some("bulk".to_string()),
            ..Default::default()
        })
        .unwrap_err();

        match err {
            ApiError::Validation(e) => assert_eq!(
                e.fields(),
                vec!["height_cm", "current_weight", "target_weight", "age", "gender", "fitness_goal"]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_update_blank_name_is_dropped() {
        let update = ProfileService::validate_profile_update(UpdateProfileRequest {
            full_name: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(update.full_name.is_none());
    }
}
