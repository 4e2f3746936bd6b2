pub mod product;
pub mod review;

use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};

use crate::errors::{AppError, ErrorResponse};

pub use product::{
    create_product_handler, delete_product_handler, get_product_handler, list_products_handler,
    partial_update_product_handler, product_reviews_handler, update_product_handler,
};
pub use review::{
    create_review_handler, delete_review_handler, partial_update_review_handler,
    update_review_handler,
};

/// Unwraps a JSON body, turning extractor rejections into `AppError`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// An id segment that is not an `i32` names no object, so it is a 404.
pub(crate) fn path_id(
    path: Result<Path<i32>, PathRejection>,
    resource: &str,
) -> Result<i32, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!("Unparsable {} id: {}", resource, rejection.body_text());
        AppError::NotFound(format!("{} not found", resource))
    })
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

pub(crate) fn reject(err: AppError) -> ErrorResponse {
    if err.status().is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::debug!("Request rejected: {}", err);
    }
    err.to_response()
}
