pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub use delete::delete_product;
pub use get::{get_product, list_products};
pub use post::create_product;
pub use put::update_product;
