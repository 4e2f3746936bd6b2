use std::{collections::BTreeMap, fmt};

use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::review::Review;

/// A single rejected input field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Price cannot be negative")]
    InvalidPrice,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("You have already reviewed this product")]
    DuplicateReview,

    #[error("Product {0} does not exist")]
    UnknownProduct(i32),

    #[error("Enter a number")]
    InvalidNumber { field: &'static str },

    #[error("This field is required")]
    Required { field: &'static str },

    #[error("This field may not be blank")]
    Blank { field: &'static str },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidPrice => "price",
            ValidationError::InvalidRating => "rating",
            ValidationError::DuplicateReview | ValidationError::UnknownProduct(_) => "product",
            ValidationError::InvalidNumber { field }
            | ValidationError::Required { field }
            | ValidationError::Blank { field } => field,
        }
    }
}

/// Every field error found while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Records the error of `result`, if any, and hands back the value.
    pub fn collect<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Messages grouped by the field they belong to.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut fields: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.0 {
            fields.entry(error.field()).or_default().push(error.to_string());
        }
        fields
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field(), e))
            .collect();
        write!(f, "{}", fields.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price < Decimal::ZERO {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(price)
}

pub fn validate_rating(rating: i64) -> Result<i16, ValidationError> {
    match rating {
        1..=5 => Ok(rating as i16),
        _ => Err(ValidationError::InvalidRating),
    }
}

/// Reads a JSON price given as a number or a numeric string.
pub fn parse_price(raw: &Value) -> Result<Decimal, ValidationError> {
    let invalid = ValidationError::InvalidNumber { field: "price" };
    let text = match raw {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return Err(invalid),
    };
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid)
}

/// Reads a JSON rating given as an integral number or an integer string.
///
/// Numeric values that are not a whole number in range (`5.5`, `1e20`) are
/// ratings outside 1..5; anything that is not a number at all is not.
pub fn parse_rating(raw: &Value) -> Result<i64, ValidationError> {
    match raw {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(whole))
            .ok_or(ValidationError::InvalidRating),
        Value::String(text) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(rating) => Ok(rating),
                Err(_) => match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => {
                        whole(value).ok_or(ValidationError::InvalidRating)
                    }
                    Ok(_) | Err(_) => Err(ValidationError::InvalidNumber { field: "rating" }),
                },
            }
        }
        _ => Err(ValidationError::InvalidNumber { field: "rating" }),
    }
}

// Exactly representable integers only.
fn whole(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    (value.fract() == 0.0 && value.abs() <= LIMIT).then_some(value as i64)
}

pub fn validate_not_blank(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(value)
}

/// Fails when `author` already has a review for `product` among `existing`.
///
/// Callers pass the reviews as the store sees them right now; the storage
/// layer still holds a unique constraint on the pair for concurrent writers.
pub fn validate_unique_review<'a>(
    author: Uuid,
    product: i32,
    existing: impl IntoIterator<Item = &'a Review>,
) -> Result<(), ValidationError> {
    if existing
        .into_iter()
        .any(|review| review.author == author && review.product == product)
    {
        return Err(ValidationError::DuplicateReview);
    }
    Ok(())
}
