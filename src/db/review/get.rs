use sqlx::PgPool;

use crate::{errors::AppError, models::Review};

pub async fn get_review(id: i32, postgres: &PgPool) -> Result<Option<Review>, AppError> {
    sqlx::query_as::<_, Review>(
        "SELECT id, author_id, product_id, text, rating, created_at
        FROM product_reviews
        WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch review: {}", e)))
}

pub async fn list_reviews(product: i32, postgres: &PgPool) -> Result<Vec<Review>, AppError> {
    sqlx::query_as::<_, Review>(
        "SELECT id, author_id, product_id, text, rating, created_at
        FROM product_reviews
        WHERE product_id = $1
        ORDER BY created_at ASC, id ASC",
    )
    .bind(product)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch reviews: {}", e)))
}
