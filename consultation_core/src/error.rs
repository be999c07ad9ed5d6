//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::response::SubmissionResponse;

pub type Result<T> = std::result::Result<T, AppError>;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";
pub const INVALID_DATETIME_MESSAGE: &str = "Invalid date/time format";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An error occurred while processing your request. Please try again later.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Invalid date/time format: {0}")]
    InvalidDateTime(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    InternalServerError,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) | AppError::InvalidDateTime(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::InternalServerError
            | AppError::IoError(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::MethodNotAllowed => SubmissionResponse::failure(METHOD_NOT_ALLOWED_MESSAGE),
            AppError::Validation(errors) => {
                SubmissionResponse::failure(VALIDATION_FAILED_MESSAGE).with_errors(errors)
            }
            AppError::InvalidDateTime(input) => {
                tracing::debug!("Rejected appointment date/time: {:?}", input);
                SubmissionResponse::failure(INVALID_DATETIME_MESSAGE)
            }
            AppError::NotFound(msg) => SubmissionResponse::failure(msg),
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                SubmissionResponse::failure(GENERIC_FAILURE_MESSAGE)
            }
            AppError::InternalServerError => SubmissionResponse::failure(GENERIC_FAILURE_MESSAGE),
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                SubmissionResponse::failure(GENERIC_FAILURE_MESSAGE)
            }
            AppError::Other(err) => {
                tracing::error!("General error: {:?}", err);
                SubmissionResponse::failure(GENERIC_FAILURE_MESSAGE)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            AppError::Validation(vec!["Name is required".to_string()]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidDateTime("2024-02-30 10:00".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("disk I/O error".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_hides_detail() {
        let response = AppError::Database("no such table: consultation_requests".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let err = AppError::Validation(vec![
            "Name is required".to_string(),
            "Phone is required".to_string(),
        ]);
        assert_eq!(err.to_string(), "Validation failed: Name is required, Phone is required");
    }
}
