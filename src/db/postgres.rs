use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    db::{CatalogStore, product, review},
    errors::AppError,
    models::{NewProduct, NewReview, Product, ProductQuery, Review, ReviewDraft},
};

#[derive(Clone)]
pub struct PgCatalogStore {
    postgres: PgPool,
}

impl PgCatalogStore {
    pub fn new(postgres: PgPool) -> Self {
        Self { postgres }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.postgres)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError> {
        product::list_products(query, &self.postgres).await
    }

    async fn get_product(&self, id: i32) -> Result<Option<Product>, AppError> {
        product::get_product(id, &self.postgres).await
    }

    async fn create_product(&self, new: &NewProduct) -> Result<Product, AppError> {
        product::create_product(new, &self.postgres).await
    }

    async fn update_product(
        &self,
        id: i32,
        changes: &NewProduct,
    ) -> Result<Option<Product>, AppError> {
        product::update_product(id, changes, &self.postgres).await
    }

    async fn delete_product(&self, id: i32) -> Result<bool, AppError> {
        product::delete_product(id, &self.postgres).await
    }

    async fn list_reviews(&self, product: i32) -> Result<Vec<Review>, AppError> {
        review::list_reviews(product, &self.postgres).await
    }

    async fn get_review(&self, id: i32) -> Result<Option<Review>, AppError> {
        review::get_review(id, &self.postgres).await
    }

    async fn create_review(&self, new: &NewReview) -> Result<Review, AppError> {
        review::create_review(new, &self.postgres).await
    }

    async fn update_review(
        &self,
        id: i32,
        draft: &ReviewDraft,
    ) -> Result<Option<Review>, AppError> {
        review::update_review(id, draft, &self.postgres).await
    }

    async fn delete_review(&self, id: i32) -> Result<bool, AppError> {
        review::delete_review(id, &self.postgres).await
    }
}
