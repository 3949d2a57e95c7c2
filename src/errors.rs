use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use compute::ComputeError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(what: &str, id: i32) -> Self {
        ApiError::NotFound(format!("{} {} not found", what, id))
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) | ApiError::Compute(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Database(db_error) => match db_error.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => (StatusCode::CONFLICT, "DUPLICATE"),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    (StatusCode::CONFLICT, "REFERENCED")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            warn!("Request rejected with {}: {}", status, self);
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Sale", 3).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("taken".into()).status_and_code().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Compute(ComputeError::InvalidPeriod("reversed".into()))
                .status_and_code()
                .0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Database(DbErr::Custom("boom".into()))
                .status_and_code()
                .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::not_found("City", 7).to_string(), "City 7 not found");
    }
}
