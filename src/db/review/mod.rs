pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

pub use delete::delete_review;
pub use get::{get_review, list_reviews};
pub use patch::update_review;
pub use post::create_review;

use sqlx::error::ErrorKind;

use crate::{errors::AppError, validation::ValidationError};

/// Maps constraint violations on `product_reviews` to field errors.
pub(crate) fn map_write_error(err: sqlx::Error, product: i32, context: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(field_error) = violation_error(db_err.kind(), product) {
            return field_error.into();
        }
    }
    AppError::DatabaseError(format!("{}: {}", context, err))
}

/// The field error a review write reports for a violated constraint.
fn violation_error(kind: ErrorKind, product: i32) -> Option<ValidationError> {
    match kind {
        ErrorKind::UniqueViolation => Some(ValidationError::DuplicateReview),
        ErrorKind::ForeignKeyViolation => Some(ValidationError::UnknownProduct(product)),
        ErrorKind::CheckViolation => Some(ValidationError::InvalidRating),
        _ => None,
    }
}
