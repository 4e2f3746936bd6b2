use sqlx::PgPool;

use crate::{
    db::review::map_write_error,
    errors::AppError,
    models::{NewReview, Review},
};

pub async fn create_review(review: &NewReview, postgres: &PgPool) -> Result<Review, AppError> {
    let created = sqlx::query_as::<_, Review>(
        "INSERT INTO product_reviews (author_id, product_id, text, rating, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, author_id, product_id, text, rating, created_at",
    )
    .bind(review.author)
    .bind(review.product)
    .bind(&review.text)
    .bind(review.rating)
    .bind(review.created_at)
    .fetch_one(postgres)
    .await
    .map_err(|e| map_write_error(e, review.product, "Failed to create review"))?;

    tracing::info!(
        "Created review {} by {} for product {}",
        created.id,
        created.author,
        created.product
    );

    Ok(created)
}
