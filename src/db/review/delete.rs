use sqlx::PgPool;

use crate::errors::AppError;

pub async fn delete_review(id: i32, postgres: &PgPool) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM product_reviews WHERE id = $1")
        .bind(id)
        .execute(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete review: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
