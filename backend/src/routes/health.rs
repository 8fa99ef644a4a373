//! Health check endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe: database plus generator configuration
//! - /health/live - Liveness probe

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub plan_generator: CheckStatus,
    pub meal_generator: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: None,
        }
    }

    fn with_status(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: Some(message.into()),
        }
    }
}

fn generator_check(api_key: Option<&str>) -> CheckStatus {
    match api_key {
        Some(key) if !key.trim().is_empty() => CheckStatus::healthy(),
        _ => CheckStatus::with_status("degraded", "API key not configured"),
    }
}

fn status_response(status: &str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    status_response("healthy")
}

/// Readiness probe. Returns 503 only when the database is down; a missing
/// generator key degrades the AI endpoints but the rest keeps working.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = match db::health_check(state.db()).await {
        Ok(()) => CheckStatus::healthy(),
        Err(e) => CheckStatus::with_status("unhealthy", e.to_string()),
    };
    let is_ready = database.status == "healthy";

    let config = state.config();
    let response = HealthResponse {
        status: if is_ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks {
            database,
            plan_generator: generator_check(config.ai.api_key.as_deref()),
            meal_generator: generator_check(config.meal_ai.api_key.as_deref()),
        }),
    };

    if is_ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe
pub async fn liveness_check() -> Json<HealthResponse> {
    status_response("alive")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[test]
    fn test_generator_check_flags_missing_key() {
        assert_eq!(generator_check(None).status, "degraded");
        assert_eq!(generator_check(Some("  ")).status, "degraded");
        assert_eq!(generator_check(Some("sk-test")).status, "healthy");
    }
}
