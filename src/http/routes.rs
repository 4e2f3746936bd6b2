use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    errors::AppError,
    http::handlers::{
        create_product_handler, create_review_handler, delete_product_handler,
        delete_review_handler, get_product_handler, list_products_handler,
        partial_update_product_handler, partial_update_review_handler, product_reviews_handler,
        update_product_handler, update_review_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/products/",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/{id}/",
            get(get_product_handler)
                .put(update_product_handler)
                .patch(partial_update_product_handler)
                .delete(delete_product_handler),
        )
        .route("/products/{id}/reviews/", get(product_reviews_handler))
        .route("/reviews/", post(create_review_handler))
        .route(
            "/reviews/{id}/",
            put(update_review_handler)
                .patch(partial_update_review_handler)
                .delete(delete_review_handler),
        )
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
        .with_state(state)
}
