use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::validation::{
    ValidationError, ValidationErrors, parse_price, validate_not_blank, validate_price,
};

/// Stored product row. Serialized as-is it is the write form echoed back
/// from create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
}

/// Listing shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
}

/// Single-item shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        ProductSummary {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
        }
    }
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        ProductDetail {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// Validated product fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
}

/// Request body for create, update and partial update.
///
/// `image` distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`), so a partial update can clear it. `price` is read from
/// the raw value so an unparsable one is reported against the field.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ProductPayload {
    /// Create and full update: every field but `image` must be present.
    pub fn into_new(self) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = errors.collect(required("title", self.title).and_then(|t| validate_not_blank("title", t)));
        let description = errors.collect(
            required("description", self.description)
                .and_then(|d| validate_not_blank("description", d)),
        );
        let price = errors.collect(
            required("price", self.price)
                .and_then(|p| parse_price(&p))
                .and_then(validate_price),
        );

        match (title, description, price) {
            (Some(title), Some(description), Some(price)) if errors.is_empty() => Ok(NewProduct {
                title,
                description,
                price,
                image: self.image.flatten(),
            }),
            _ => Err(errors),
        }
    }

    /// Partial update: absent fields keep the stored value.
    pub fn apply_to(self, existing: &Product) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = errors.collect(
            validate_not_blank("title", self.title.unwrap_or_else(|| existing.title.clone())),
        );
        let description = errors.collect(validate_not_blank(
            "description",
            self.description
                .unwrap_or_else(|| existing.description.clone()),
        ));
        let price = errors.collect(match self.price {
            Some(price) => parse_price(&price).and_then(validate_price),
            None => Ok(existing.price),
        });

        match (title, description, price) {
            (Some(title), Some(description), Some(price)) if errors.is_empty() => Ok(NewProduct {
                title,
                description,
                price,
                image: self.image.unwrap_or_else(|| existing.image.clone()),
            }),
            _ => Err(errors),
        }
    }
}

pub(crate) fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Required { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Product {
        Product {
            id: 7,
            title: "Apple Iphone 12".into(),
            description: "128GB".into(),
            price: Decimal::new(70000, 0),
            image: Some("products/iphone.png".into()),
        }
    }

    #[test]
    fn test_shapes_project_expected_fields() {
        let product = stored();

        let summary = serde_json::to_value(ProductSummary::from(&product)).unwrap();
        let keys: Vec<&String> = summary.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(summary.get("description").is_none());

        let detail = serde_json::to_value(ProductDetail::from(&product)).unwrap();
        assert_eq!(detail["image"], "products/iphone.png");
        assert_eq!(detail["description"], "128GB");
    }

    #[test]
    fn test_create_requires_fields() {
        let errors = ProductPayload::default().into_new().unwrap_err();

        assert!(errors.contains(&ValidationError::Required { field: "title" }));
        assert!(errors.contains(&ValidationError::Required { field: "description" }));
        assert!(errors.contains(&ValidationError::Required { field: "price" }));
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let payload: ProductPayload = serde_json::from_str(
            r#"{"title": "Phone", "description": "Cheap", "price": "-1.00"}"#,
        )
        .unwrap();

        let errors = payload.into_new().unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidPrice));
    }

    #[test]
    fn test_unparsable_price_is_a_field_error() {
        let payload: ProductPayload = serde_json::from_str(
            r#"{"title": "", "description": "Cheap", "price": "free"}"#,
        )
        .unwrap();

        let errors = payload.into_new().unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidNumber { field: "price" }));
        assert!(errors.contains(&ValidationError::Blank { field: "title" }));
    }

    #[test]
    fn test_numeric_price_is_accepted() {
        let payload: ProductPayload = serde_json::from_str(
            r#"{"title": "Phone", "description": "Cheap", "price": 199.5}"#,
        )
        .unwrap();

        assert_eq!(payload.into_new().unwrap().price, Decimal::new(1995, 1));
    }

    #[test]
    fn test_partial_update_keeps_absent_fields() {
        let payload: ProductPayload = serde_json::from_str(r#"{"price": "65000"}"#).unwrap();

        let updated = payload.apply_to(&stored()).unwrap();
        assert_eq!(updated.title, "Apple Iphone 12");
        assert_eq!(updated.price, Decimal::new(65000, 0));
        assert_eq!(updated.image.as_deref(), Some("products/iphone.png"));
    }

    #[test]
    fn test_partial_update_null_image_clears_it() {
        let payload: ProductPayload = serde_json::from_str(r#"{"image": null}"#).unwrap();

        let updated = payload.apply_to(&stored()).unwrap();
        assert_eq!(updated.image, None);
    }
}
