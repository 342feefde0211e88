use std::time::Duration;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use etfcast_core::{ErrorCategory, ProjectionError};
use serde_json::json;

/// Errors returned by the HTTP API and the CLI
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid parameter: {field} - {message}")]
    ValidationError { field: String, message: String },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("{0}")]
    Projection(#[from] ProjectionError),

    #[error("Projection did not finish within {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Mutex lock error")]
    LockError,

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Projection(err) => match err.category() {
                ErrorCategory::InvalidInput
                | ErrorCategory::InsufficientHistory
                | ErrorCategory::NumericalDegeneracy
                | ErrorCategory::ResourceLimit => StatusCode::BAD_REQUEST,
                ErrorCategory::DataSource => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::DatabaseError(_) | ApiError::LockError | ApiError::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ApiError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        ApiError::LockError
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            ApiError::DatabaseError(_) => {
                tracing::error!("Database error: {self}");
                "Internal database error".to_string()
            }
            ApiError::LockError | ApiError::InternalError => {
                tracing::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
            ApiError::Projection(err) if err.category() == ErrorCategory::DataSource => {
                tracing::warn!("Historical data unavailable: {err}");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Helper type for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use etfcast_core::{InputError, SourceError};

    #[test]
    fn test_projection_errors_map_to_status() {
        let cases = [
            (
                ProjectionError::from(InputError::WeightSum { sum: 0.9 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProjectionError::InsufficientHistory { periods: 1 },
                StatusCode::BAD_REQUEST,
            ),
            (
                ProjectionError::ResourceLimit {
                    field: "simulations",
                    value: 20_000,
                    max: 10_000,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ProjectionError::from(SourceError::Unavailable {
                    instrument: "IE00B4L5Y983".to_string(),
                    reason: "locked".to_string(),
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_timeout_and_internal_status() {
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(30)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::DatabaseError("disk I/O error".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_projection_message_is_passed_through() {
        let err = ApiError::from(ProjectionError::InsufficientHistory { periods: 1 });
        assert_eq!(
            err.to_string(),
            ProjectionError::InsufficientHistory { periods: 1 }.to_string()
        );
    }
}
