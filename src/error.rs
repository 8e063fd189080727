use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// The primary error type for the application.
///
/// Every handler returns [`AppResult`]; whatever goes wrong ends up here and
/// is rendered as a JSON body of the form `{ "error": "<message>" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unexpected failures. Logged, reported as 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
    /// The request could not be decoded at all.
    #[error("{0}")]
    BadRequest(String),
    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Anything the persistence layer refused or failed to do.
    #[error("{0}")]
    Storage(String),
    /// A specific field failed an explicit validation check.
    #[error("{field}: {message}")]
    ValidationError {
        /// The name of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) | AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationError { field: field.to_string(), message: message.into() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(e) => tracing::error!("Internal error: {:?}", e),
            AppError::Storage(msg) => tracing::error!("Storage error: {}", msg),
            AppError::NotFound(msg) => tracing::debug!("Not found: {}", msg),
            AppError::BadRequest(_) | AppError::ValidationError { .. } => {
                tracing::warn!("Rejected request: {}", self)
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(StoreError::from(err).to_string())
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

/// Converts an `Option` into a `NotFound` error.
pub trait OptionExt<T> {
    /// `Err(AppError::NotFound("<entity> not found"))` when `None`.
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
    }
}

/// Explicit input checks used when `api.strict_validation` is on.
pub mod validation {
    use super::*;

    /// A required text field must be present and not blank.
    pub fn require_text<'a>(value: Option<&'a str>, field: &str) -> AppResult<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            Some(_) => Err(AppError::validation(field, "must not be empty")),
            None => Err(AppError::validation(field, "is required")),
        }
    }

    /// Validates that a number is positive.
    pub fn validate_positive_number(value: Option<i64>, field: &str) -> AppResult<()> {
        if let Some(v) = value {
            if v <= 0 {
                return Err(AppError::ValidationError {
                    field: field.to_string(),
                    message: format!("must be positive, got {}", v),
                });
            }
        }
        Ok(())
    }
}
