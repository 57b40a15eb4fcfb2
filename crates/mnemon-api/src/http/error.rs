//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Every failure leaves the service as:
//! ```json
//! {
//!   "error_code": "VALIDATION_ERROR",
//!   "message": "...",
//!   "details": { "errors": [{ "field": "...", "message": "...", "type": "..." }] },
//!   "timestamp": "..."
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use mnemon_core::service::memory::RecordActionError;
use mnemon_types::error::{ActionError, MemoryServiceError, ProfileError, TaskError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing request fields. Carries the offending field
    /// name when one is identifiable.
    Validation {
        field: Option<String>,
        message: String,
    },
    /// Unrecognized action tag.
    InvalidActionType(String),
    /// Date range with start after end.
    InvalidRange(String),
    /// Unknown task, profile, or user.
    NotFound(String),
    /// Optimistic update rejected.
    Conflict(String),
    /// External memory engine failure.
    Service(String),
    /// Generic internal error.
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            field: None,
            message: message.into(),
        }
    }

    pub fn validation_field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

impl From<TaskError> for AppError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::NotFound => AppError::NotFound("task not found".to_string()),
            TaskError::InvalidRange { .. } => AppError::InvalidRange(e.to_string()),
            TaskError::AlreadyTerminal(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NotFound => AppError::NotFound("profile not found".to_string()),
            ProfileError::Conflict { .. } => AppError::Conflict(e.to_string()),
            ProfileError::Validation(msg) => AppError::validation(msg),
            ProfileError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl From<MemoryServiceError> for AppError {
    fn from(e: MemoryServiceError) -> Self {
        match e {
            MemoryServiceError::Validation(msg) => AppError::validation(msg),
            other => AppError::Service(other.to_string()),
        }
    }
}

impl From<ActionError> for AppError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::InvalidActionType(tag) => AppError::InvalidActionType(tag),
            ActionError::MissingTag => AppError::validation_field(
                "action_type",
                "action record carries neither 'action_type' nor 'action'",
            ),
        }
    }
}

impl From<RecordActionError> for AppError {
    fn from(e: RecordActionError) -> Self {
        match e {
            RecordActionError::Action(e) => e.into(),
            RecordActionError::Memory(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, field, message) = match self {
            AppError::Validation { field, message } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", field, message)
            }
            AppError::InvalidActionType(tag) => (
                StatusCode::BAD_REQUEST,
                "INVALID_ACTION_TYPE",
                Some("action_type".to_string()),
                format!("invalid action type: '{tag}'"),
            ),
            AppError::InvalidRange(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_RANGE", None, msg)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", None, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", None, msg),
            AppError::Service(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_ERROR", None, msg)
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None, msg)
            }
        };

        let body = json!({
            "error_code": code,
            "message": &message,
            "details": {
                "errors": [{
                    "field": field,
                    "message": &message,
                    "type": code.to_lowercase(),
                }]
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_maps_to_400() {
        let err: AppError = TaskError::InvalidRange {
            start: chrono::NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        }
        .into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn profile_conflict_maps_to_409() {
        let err: AppError = ProfileError::Conflict {
            pid: "p1".to_string(),
        }
        .into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_timeout_maps_to_503() {
        let err: AppError = MemoryServiceError::Timeout.into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
