use sqlx::PgPool;

use crate::errors::AppError;

/// Reviews go with the product through `ON DELETE CASCADE`.
pub async fn delete_product(id: i32, postgres: &PgPool) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete product: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
