use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::response::ApiResponse;

/// Application-level error type.
///
/// Business-rule violations (quota, duplicate, stale version, missing record)
/// are distinct named variants so the handlers can map each one to its own
/// envelope code instead of collapsing everything into a 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("The user context is missing or invalid")]
    Unauthorized,

    #[error("The user does not have the correct roles to access this functionality")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("The profile for this ID number already exists. Please use the existing profile instead")]
    DuplicateIdNumber,

    #[error("Conflict detected, version out of date")]
    VersionConflict,

    #[error("You have already created the maximum amount of profiles. Please upgrade your plan to continue or delete unused profiles")]
    QuotaExceeded,

    #[error("No data could be retrieved")]
    NoData,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::NoData => StatusCode::NOT_FOUND,
            AppError::DuplicateIdNumber
            | AppError::VersionConflict
            | AppError::QuotaExceeded => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed in the response envelope. Infrastructure details stay
    /// in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred and the request could not be processed".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred and the request could not be processed".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::from_error(String::new(), &self).into_response()
    }
}
