use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    db::CatalogStore,
    errors::AppError,
    models::{NewProduct, NewReview, Product, ProductQuery, Review, ReviewDraft},
    validation::ValidationError,
};

/// Process-local store with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    products: BTreeMap<i32, Product>,
    reviews: BTreeMap<i32, Review>,
    product_seq: i32,
    review_seq: i32,
}

impl Tables {
    /// Mirrors the foreign key and the `(author_id, product_id)` constraint.
    fn check_review(
        &self,
        id: Option<i32>,
        author: uuid::Uuid,
        product: i32,
    ) -> Result<(), AppError> {
        if !self.products.contains_key(&product) {
            return Err(ValidationError::UnknownProduct(product).into());
        }
        let taken = self.reviews.values().any(|review| {
            Some(review.id) != id && review.author == author && review.product == product
        });
        if taken {
            return Err(ValidationError::DuplicateReview.into());
        }
        Ok(())
    }
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|product| query.matches(product))
            .cloned()
            .collect();
        products.sort_by(|a, b| query.compare(a, b));
        Ok(products)
    }

    async fn get_product(&self, id: i32) -> Result<Option<Product>, AppError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, new: &NewProduct) -> Result<Product, AppError> {
        let mut tables = self.tables.write().await;
        tables.product_seq += 1;
        let product = Product {
            id: tables.product_seq,
            title: new.title.clone(),
            description: new.description.clone(),
            price: new.price,
            image: new.image.clone(),
        };
        tables.products.insert(product.id, product.clone());

        tracing::info!("Created product: {} (ID: {})", product.title, product.id);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        changes: &NewProduct,
    ) -> Result<Option<Product>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        product.title = changes.title.clone();
        product.description = changes.description.clone();
        product.price = changes.price;
        product.image = changes.image.clone();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&id).is_none() {
            return Ok(false);
        }
        tables.reviews.retain(|_, review| review.product != id);
        Ok(true)
    }

    async fn list_reviews(&self, product: i32) -> Result<Vec<Review>, AppError> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<Review> = tables
            .reviews
            .values()
            .filter(|review| review.product == product)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(reviews)
    }

    async fn get_review(&self, id: i32) -> Result<Option<Review>, AppError> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn create_review(&self, new: &NewReview) -> Result<Review, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_review(None, new.author, new.product)?;

        tables.review_seq += 1;
        let review = Review {
            id: tables.review_seq,
            author: new.author,
            product: new.product,
            text: new.text.clone(),
            rating: new.rating,
            created_at: new.created_at,
        };
        tables.reviews.insert(review.id, review.clone());

        tracing::info!(
            "Created review {} by {} for product {}",
            review.id,
            review.author,
            review.product
        );
        Ok(review)
    }

    async fn update_review(
        &self,
        id: i32,
        draft: &ReviewDraft,
    ) -> Result<Option<Review>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(author) = tables.reviews.get(&id).map(|review| review.author) else {
            return Ok(None);
        };
        tables.check_review(Some(id), author, draft.product)?;

        let Some(review) = tables.reviews.get_mut(&id) else {
            return Ok(None);
        };
        review.product = draft.product;
        review.text = draft.text.clone();
        review.rating = draft.rating;
        Ok(Some(review.clone()))
    }

    async fn delete_review(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn new_product(title: &str) -> NewProduct {
        NewProduct {
            title: title.into(),
            description: "desc".into(),
            price: Decimal::new(100, 0),
            image: None,
        }
    }

    fn new_review(author: Uuid, product: i32) -> NewReview {
        NewReview {
            author,
            product,
            text: "Nice".into(),
            rating: 5,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_review_is_rejected_at_write() {
        let store = MemoryCatalogStore::new();
        let product = store.create_product(&new_product("Phone")).await.unwrap();
        let author = Uuid::new_v4();

        store
            .create_review(&new_review(author, product.id))
            .await
            .unwrap();
        let err = store
            .create_review(&new_review(author, product.id))
            .await
            .unwrap_err();

        match err {
            AppError::Validation(errors) => {
                assert!(errors.contains(&ValidationError::DuplicateReview))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_review_for_missing_product_is_rejected() {
        let store = MemoryCatalogStore::new();

        let err = store
            .create_review(&new_review(Uuid::new_v4(), 42))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_deleting_product_drops_its_reviews() {
        let store = MemoryCatalogStore::new();
        let kept = store.create_product(&new_product("Kept")).await.unwrap();
        let gone = store.create_product(&new_product("Gone")).await.unwrap();
        let author = Uuid::new_v4();
        store.create_review(&new_review(author, kept.id)).await.unwrap();
        let review = store.create_review(&new_review(author, gone.id)).await.unwrap();

        assert!(store.delete_product(gone.id).await.unwrap());
        assert!(store.get_review(review.id).await.unwrap().is_none());
        assert_eq!(store.list_reviews(kept.id).await.unwrap().len(), 1);
        assert!(!store.delete_product(gone.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_review_keeps_author_and_timestamp() {
        let store = MemoryCatalogStore::new();
        let product = store.create_product(&new_product("Phone")).await.unwrap();
        let created = store
            .create_review(&new_review(Uuid::new_v4(), product.id))
            .await
            .unwrap();

        let updated = store
            .update_review(
                created.id,
                &ReviewDraft {
                    product: product.id,
                    text: "Changed my mind".into(),
                    rating: 2,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.author, created.author);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.rating, 2);
    }
}
