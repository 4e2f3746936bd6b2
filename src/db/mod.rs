pub mod memory;
pub mod postgres;
pub mod product;
pub mod review;

use async_trait::async_trait;

use crate::{
    errors::AppError,
    models::{NewProduct, NewReview, Product, ProductQuery, Review, ReviewDraft},
};

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Persistence for products and their reviews.
///
/// Implementations must reject a second review by the same author for the
/// same product with `ValidationError::DuplicateReview`, atomically with the
/// write, and must drop a product's reviews together with the product.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError>;

    async fn get_product(&self, id: i32) -> Result<Option<Product>, AppError>;

    async fn create_product(&self, product: &NewProduct) -> Result<Product, AppError>;

    async fn update_product(
        &self,
        id: i32,
        product: &NewProduct,
    ) -> Result<Option<Product>, AppError>;

    async fn delete_product(&self, id: i32) -> Result<bool, AppError>;

    /// Reviews of one product, oldest first.
    async fn list_reviews(&self, product: i32) -> Result<Vec<Review>, AppError>;

    async fn get_review(&self, id: i32) -> Result<Option<Review>, AppError>;

    async fn create_review(&self, review: &NewReview) -> Result<Review, AppError>;

    /// Rewrites product, text and rating; author and created_at stay put.
    async fn update_review(&self, id: i32, draft: &ReviewDraft)
    -> Result<Option<Review>, AppError>;

    async fn delete_review(&self, id: i32) -> Result<bool, AppError>;
}
