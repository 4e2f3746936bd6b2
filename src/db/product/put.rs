use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::{NewProduct, Product},
};

pub async fn update_product(
    id: i32,
    product: &NewProduct,
    postgres: &PgPool,
) -> Result<Option<Product>, AppError> {
    sqlx::query_as::<_, Product>(
        "UPDATE products
        SET title = $2, description = $3, price = $4, image = $5
        WHERE id = $1
        RETURNING id, title, description, price, image",
    )
    .bind(id)
    .bind(&product.title)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to update product: {}", e)))
}
