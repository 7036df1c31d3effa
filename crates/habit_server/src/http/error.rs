//! Error responses for the HTTP surface.
//!
//! # Responsibility
//! - Map service failures to status codes and stable `code` strings.
//! - Render every failure as `{"error":{"code","message"}}`.
//!
//! # Invariants
//! - Store failures are logged in full but answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use habit_core::ServiceError;
use log::error;
use serde_json::json;

/// Client-visible failure with a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_request",
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "validation_failed",
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "store_unavailable",
            message: "the habit store failed to complete the request".to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::validation(err.to_string()),
            ServiceError::HabitNotFound(id) => Self {
                status: StatusCode::NOT_FOUND,
                code: "habit_not_found",
                message: format!("habit not found: {id}"),
            },
            ServiceError::Repo(err) => {
                // Store details stay in the log, not the response.
                error!(
                    "event=store_failure module=http status=error error={}",
                    err
                );
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use habit_core::{HabitValidationError, RepoError, ServiceError};
    use uuid::Uuid;

    #[test]
    fn service_errors_map_to_status_codes() {
        let validation = ApiError::from(ServiceError::Validation(HabitValidationError::NoWeekDays));
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.code, "validation_failed");

        let missing = ApiError::from(ServiceError::HabitNotFound(Uuid::nil()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let store = ApiError::from(ServiceError::Repo(RepoError::InvalidData(
            "bad row".to_string(),
        )));
        assert_eq!(store.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!store.message.contains("bad row"));
    }
}
