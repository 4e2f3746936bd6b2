pub mod product;
pub mod query;
pub mod review;

pub use product::{NewProduct, Product, ProductDetail, ProductPayload, ProductSummary};
pub use query::{ProductQuery, ProductQueryParams};
pub use review::{NewReview, Review, ReviewDraft, ReviewPayload};
