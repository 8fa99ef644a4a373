//! JSON body extractor with validation-shaped rejections
//!
//! Axum's `Json` rejects a mistyped field with a plain-text 422. Here every
//! body problem becomes an [`ApiError::Validation`] naming the offending
//! field, so clients handle it like any other violation.

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use fitness_planner_shared::{FieldViolation, ViolationKind};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Field name used when the body as a whole is unusable
pub const FIELD_BODY: &str = "body";

/// `Json<T>` that rejects with [`ApiError::Validation`]
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(body_violation)?;

        if !value.is_object() {
            return Err(FieldViolation::new(FIELD_BODY, ViolationKind::WrongType, "must be a JSON object").into());
        }

        serde_path_to_error::deserialize(value)
            .map(ValidatedJson)
            .map_err(|err| {
                let field = match err.path().to_string() {
                    path if path == "." => FIELD_BODY.to_string(),
                    path => path,
                };
                field_violation(&field, &err.into_inner().to_string()).into()
            })
    }
}

fn body_violation(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "must be sent as application/json".to_string(),
        JsonRejection::JsonSyntaxError(_) => "is not valid JSON".to_string(),
        other => other.body_text(),
    };
    FieldViolation::new(FIELD_BODY, ViolationKind::WrongType, message).into()
}

/// Violation for a value serde could not accept.
///
/// A missing required field is reported on that field; type mismatches on
/// numeric fields read as "must be a number".
fn field_violation(field: &str, serde_message: &str) -> FieldViolation {
    if let Some(name) = serde_message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        return FieldViolation::missing(name);
    }

    let numeric = ["expected f64", "expected f32", "expected i32", "expected i64", "expected u32"]
        .iter()
        .any(|expected| serde_message.contains(expected));

    if numeric {
        FieldViolation::new(field, ViolationKind::NotANumber, "must be a number")
    } else {
        FieldViolation::new(field, ViolationKind::WrongType, "has the wrong type")
    }
}
