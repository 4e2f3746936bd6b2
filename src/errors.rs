use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::{ValidationError, ValidationErrors};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    InternalError,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        AppError::Validation(error.into())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<&'static str, Vec<String>>,
}

pub type ErrorResponse = (StatusCode, Json<ErrorBody>);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::JwtError(_) | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::EnvError(_)
            | AppError::DatabaseError(_)
            | AppError::Io(_)
            | AppError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::JwtError(_) | AppError::Unauthorized(_) => "not_authenticated",
            AppError::Forbidden(_) => "permission_denied",
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::MethodNotAllowed => "method_not_allowed",
            AppError::EnvError(_)
            | AppError::DatabaseError(_)
            | AppError::Io(_)
            | AppError::InternalError => "internal_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (message, fields) = match self {
            AppError::Validation(errors) => ("Invalid input".to_string(), errors.by_field()),
            AppError::JwtError(_) => ("Invalid or expired token".to_string(), BTreeMap::new()),
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg) => (msg.clone(), BTreeMap::new()),
            AppError::MethodNotAllowed => (self.to_string(), BTreeMap::new()),
            // Server-side details stay in the logs.
            AppError::EnvError(_)
            | AppError::DatabaseError(_)
            | AppError::Io(_)
            | AppError::InternalError => ("Unexpected server error".to_string(), BTreeMap::new()),
        };

        (
            self.status(),
            Json(ErrorBody {
                error: self.code(),
                message,
                fields,
            }),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_carry_fields() {
        let err = AppError::from(ValidationError::InvalidRating);
        let (status, Json(body)) = err.to_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "validation_error");
        assert_eq!(body.fields["rating"], vec!["Rating must be between 1 and 5"]);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Forbidden("nope".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Unauthorized("who".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );

        let (status, Json(body)) = AppError::MethodNotAllowed.to_response();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.error, "method_not_allowed");
    }

    #[test]
    fn test_database_errors_are_not_leaked() {
        let (status, Json(body)) =
            AppError::DatabaseError("relation products does not exist".into()).to_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Unexpected server error");
        assert!(body.fields.is_empty());
    }
}
