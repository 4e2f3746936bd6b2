use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    models::product::required,
    validation::{ValidationErrors, parse_rating, validate_not_blank, validate_rating},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductReview {
    pub id: i32,
    #[sqlx(rename = "author_id")]
    pub author: Uuid,
    #[sqlx(rename = "product_id")]
    pub product: i32,
    pub text: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

pub type Review = ProductReview;

/// Review body as clients send it. There is no `author` or `created_at`
/// here: those keys are dropped during deserialization and filled in by
/// the server. `rating` is kept raw so a malformed value becomes a field
/// error instead of failing the whole body.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewPayload {
    pub product: Option<i32>,
    pub text: Option<String>,
    pub rating: Option<Value>,
}

/// Review fields after the per-field checks, before the product and
/// uniqueness lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub product: i32,
    pub text: String,
    pub rating: i16,
}

impl ReviewPayload {
    /// With `base == None` every field is required (create, full update);
    /// otherwise absent fields fall back to the stored review.
    pub fn resolve(self, base: Option<&Review>) -> Result<ReviewDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let product = match (self.product, base) {
            (Some(product), _) => Some(product),
            (None, Some(review)) => Some(review.product),
            (None, None) => errors.collect(required("product", None::<i32>)),
        };
        let text = match (self.text, base) {
            (Some(text), _) => errors.collect(validate_not_blank("text", text)),
            (None, Some(review)) => Some(review.text.clone()),
            (None, None) => errors.collect(required("text", None::<String>)),
        };
        let rating = match (self.rating, base) {
            (Some(rating), _) => {
                errors.collect(parse_rating(&rating).and_then(validate_rating))
            }
            (None, Some(review)) => Some(review.rating),
            (None, None) => errors.collect(required("rating", None::<i16>)),
        };

        match (product, text, rating) {
            (Some(product), Some(text), Some(rating)) if errors.is_empty() => Ok(ReviewDraft {
                product,
                text,
                rating,
            }),
            _ => Err(errors),
        }
    }
}

/// A review as it is inserted: author and timestamp come from the
/// authenticated caller and the server clock.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub author: Uuid,
    pub product: i32,
    pub text: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

impl NewReview {
    pub fn stamp(author: Uuid, draft: ReviewDraft) -> Self {
        NewReview {
            author,
            product: draft.product,
            text: draft.text,
            rating: draft.rating,
            created_at: Utc::now(),
        }
    }
}
