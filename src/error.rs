// src/error.rs

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Global Application Error Enum.
/// Every store operation reports failures through one of these variants,
/// and handlers return them directly as JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or null.
    #[error("{0}")]
    Validation(String),

    /// The image is not a well-formed base64 data URI.
    #[error("{0}")]
    Format(String),

    /// The image subtype is outside the accepted set.
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("{0}")]
    NotFound(String),

    /// A referenced user or question does not exist.
    #[error("{0}")]
    ForeignKey(String),

    /// At least one item of a bulk upload was invalid; nothing was stored.
    #[error("{0}")]
    BatchValidation(String),

    /// Duplicate value in a unique column (e.g. user email).
    #[error("{0}")]
    Conflict(String),

    /// Request body exceeds the configured size limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Commit or rollback failed.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Any other persistence-layer failure.
    #[error("{0}")]
    Storage(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Format(_)
            | AppError::UnsupportedType(_)
            | AppError::ForeignKey(_)
            | AppError::BatchValidation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Transaction(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
/// Storage details are logged but not echoed back to the caller.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                "Internal Server Error".to_string()
            }
            AppError::Transaction(msg) => {
                tracing::error!("Transaction error: {}", msg);
                "Transaction failed".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Classifies `sqlx::Error` so `?` on a query yields the right variant.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_foreign_key_violation() {
                return AppError::ForeignKey(
                    "Referenced user or question does not exist".to_string(),
                );
            }
            if db_err.is_unique_violation() {
                return AppError::Conflict(db_err.message().to_string());
            }
        }
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::Validation(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_client_status() {
        assert_eq!(
            AppError::UnsupportedType("gif".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BatchValidation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("missing".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PayloadTooLarge("too big".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn infrastructure_errors_are_server_status() {
        assert_eq!(
            AppError::Transaction("disk".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unsupported_type_message_names_the_subtype() {
        assert_eq!(
            AppError::UnsupportedType("gif".into()).to_string(),
            "Unsupported image type: gif"
        );
    }
}
