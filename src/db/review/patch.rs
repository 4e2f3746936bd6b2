use sqlx::PgPool;

use crate::{
    db::review::map_write_error,
    errors::AppError,
    models::{Review, ReviewDraft},
};

pub async fn update_review(
    id: i32,
    draft: &ReviewDraft,
    postgres: &PgPool,
) -> Result<Option<Review>, AppError> {
    sqlx::query_as::<_, Review>(
        "UPDATE product_reviews
        SET product_id = $2, text = $3, rating = $4
        WHERE id = $1
        RETURNING id, author_id, product_id, text, rating, created_at",
    )
    .bind(id)
    .bind(draft.product)
    .bind(&draft.text)
    .bind(draft.rating)
    .fetch_optional(postgres)
    .await
    .map_err(|e| map_write_error(e, draft.product, "Failed to update review"))
}
