//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::llm::GenerationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitness_planner_shared::types::{ErrorDetail, ErrorResponse};
use fitness_planner_shared::validation::get_missing_fields_labels;
use fitness_planner_shared::{FieldViolation, MacroTargets, TargetError, UnsafeTarget, ValidationError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Stored profile cannot produce targets. `invalid` holds values that
    /// are present but rejected, reported alongside the missing ones.
    #[error("Please complete your profile first")]
    ProfileIncomplete {
        missing_fields: Vec<String>,
        invalid: Vec<FieldViolation>,
    },

    #[error(transparent)]
    UnsafeTarget(#[from] UnsafeTarget),

    /// Text generation failed. `targets` carries any targets computed before
    /// the call; they remain valid.
    #[error("Text generation failed: {source}")]
    Generation {
        #[source]
        source: GenerationError,
        targets: Option<MacroTargets>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl From<TargetError> for ApiError {
    fn from(err: TargetError) -> Self {
        match err {
            TargetError::Validation(e) => ApiError::Validation(e),
            TargetError::Unsafe(e) => ApiError::UnsafeTarget(e),
        }
    }
}

impl From<FieldViolation> for ApiError {
    fn from(violation: FieldViolation) -> Self {
        ApiError::Validation(ValidationError::single(violation))
    }
}

impl From<GenerationError> for ApiError {
    fn from(source: GenerationError) -> Self {
        ApiError::Generation {
            source,
            targets: None,
        }
    }
}

impl ApiError {
    /// Attach still-valid targets to a generation failure
    pub fn generation_with_targets(source: GenerationError, targets: MacroTargets) -> Self {
        ApiError::Generation {
            source,
            targets: Some(targets),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let mut details = None;

        let (status, code, message) = match &self {
            ApiError::Validation(err) => {
                field = err.violations.first().map(|v| v.field.clone());
                details = Some(json!({ "violations": err.violations }));
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            }
            ApiError::ProfileIncomplete {
                missing_fields,
                invalid,
            } => {
                field = missing_fields.first().cloned();
                details = Some(json!({
                    "missing_fields": missing_fields,
                    "missing_labels": get_missing_fields_labels(missing_fields),
                    "violations": invalid,
                }));
                (StatusCode::BAD_REQUEST, "PROFILE_INCOMPLETE", self.to_string())
            }
            ApiError::UnsafeTarget(err) => {
                details = serde_json::to_value(err).ok();
                (StatusCode::UNPROCESSABLE_ENTITY, "UNSAFE_TARGET", err.to_string())
            }
            ApiError::Generation { source, targets } => {
                warn!(reason = source.reason(), "Upstream generation error: {}", source);
                details = Some(json!({ "reason": source.reason(), "targets": targets }));
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_GENERATION_ERROR",
                    "The AI service could not produce a usable response".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                details,
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitness_planner_shared::ViolationKind;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let error = ApiError::Validation(ValidationError::new(vec![
            FieldViolation::new("age", ViolationKind::OutOfRange, "must be between 13 and 150 years"),
            FieldViolation::missing("gender"),
        ]));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "age");
        assert_eq!(body["error"]["details"]["violations"][1]["field"], "gender");
        assert_eq!(body["error"]["details"]["violations"][1]["kind"], "missing");
    }

    #[tokio::test]
    async fn test_profile_incomplete_includes_labels() {
        let error = ApiError::ProfileIncomplete {
            missing_fields: vec!["height".to_string(), "age".to_string()],
            invalid: Vec::new(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "PROFILE_INCOMPLETE");
        assert_eq!(body["error"]["message"], "Please complete your profile first");
        assert_eq!(body["error"]["details"]["missing_labels"][0], "Height");
        assert_eq!(body["error"]["details"]["violations"], json!([]));
    }

    #[tokio::test]
    async fn test_profile_incomplete_reports_invalid_values_too() {
        let error = ApiError::ProfileIncomplete {
            missing_fields: vec!["current_weight".to_string()],
            invalid: vec![FieldViolation::new("age", ViolationKind::OutOfRange, "must be between 13 and 120")],
        };
        let body = body_json(error.into_response()).await;

        assert_eq!(body["error"]["field"], "current_weight");
        assert_eq!(body["error"]["details"]["missing_fields"], json!(["current_weight"]));
        assert_eq!(body["error"]["details"]["violations"][0]["field"], "age");
        assert_eq!(body["error"]["details"]["violations"][0]["kind"], "out_of_range");
    }

    #[test]
    fn test_generation_message_names_no_particular_feature() {
        let error: ApiError = GenerationError::Timeout.into();
        let message = error.to_string();
        assert!(message.starts_with("Text generation failed: "), "{message}");
        assert!(!message.contains("Plan"));
    }

    #[tokio::test]
    async fn test_unsafe_target_is_unprocessable() {
        let error: ApiError = TargetError::Unsafe(UnsafeTarget::BelowCalorieFloor {
            calories: 950,
            floor: 1200,
        })
        .into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNSAFE_TARGET");
        assert_eq!(body["error"]["details"]["reason"], "below_calorie_floor");
    }

    #[tokio::test]
    async fn test_generation_error_keeps_targets() {
        let targets = MacroTargets {
            calories: 2759,
            protein_grams: 128,
            carbs_grams: 389,
            fat_grams: 77,
        };
        let error = ApiError::generation_with_targets(GenerationError::Timeout, targets);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UPSTREAM_GENERATION_ERROR");
        assert_eq!(body["error"]["details"]["reason"], "timeout");
        assert_eq!(body["error"]["details"]["targets"]["carbs"], 389);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("Plan not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_error_status() {
        let error = ApiError::Unauthorized("Invalid token".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
