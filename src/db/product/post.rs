use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::{NewProduct, Product},
};

pub async fn create_product(product: &NewProduct, postgres: &PgPool) -> Result<Product, AppError> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (title, description, price, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, description, price, image",
    )
    .bind(&product.title)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create product: {}", e)))?;

    tracing::info!("Created product: {} (ID: {})", product.title, product.id);

    Ok(product)
}
