use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    models::product::Product,
    validation::{ValidationError, ValidationErrors},
};

/// Raw `GET /products/` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQueryParams {
    pub price_from: Option<String>,
    pub price_to: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    From,
    To,
}

impl PriceBound {
    pub fn param(self) -> &'static str {
        match self {
            PriceBound::From => "price_from",
            PriceBound::To => "price_to",
        }
    }

    pub fn column(self) -> &'static str {
        "price"
    }

    pub fn operator(self) -> &'static str {
        match self {
            PriceBound::From => ">=",
            PriceBound::To => "<=",
        }
    }

    pub fn admits(self, bound: Decimal, price: Decimal) -> bool {
        match self {
            PriceBound::From => price >= bound,
            PriceBound::To => price <= bound,
        }
    }
}

pub const SEARCH_COLUMNS: [&str; 2] = ["title", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Title,
    Price,
}

impl OrderField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(OrderField::Title),
            "price" => Some(OrderField::Price),
            _ => None,
        }
    }

    /// SQL sort keys, most significant first. Titles order case-insensitively
    /// with byte order breaking ties, independent of the database collation.
    pub fn sort_keys(self) -> &'static [&'static str] {
        match self {
            OrderField::Title => &[r#"LOWER(title) COLLATE "C""#, r#"title COLLATE "C""#],
            OrderField::Price => &["price"],
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            OrderField::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
            OrderField::Price => a.price.cmp(&b.price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub field: OrderField,
    pub direction: Direction,
}

impl OrderTerm {
    /// `price`, `-price`, `title`, `-title`. Anything else is `None`.
    pub fn parse(term: &str) -> Option<Self> {
        let term = term.trim();
        let (name, direction) = match term.strip_prefix('-') {
            Some(name) => (name, Direction::Desc),
            None => (term, Direction::Asc),
        };
        OrderField::parse(name).map(|field| OrderTerm { field, direction })
    }
}

/// Validated filters for the product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub price_from: Option<Decimal>,
    pub price_to: Option<Decimal>,
    pub search_terms: Vec<String>,
    pub ordering: Vec<OrderTerm>,
}

impl TryFrom<ProductQueryParams> for ProductQuery {
    type Error = ValidationErrors;

    fn try_from(params: ProductQueryParams) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::default();

        let price_from = errors
            .collect(parse_bound(PriceBound::From, params.price_from))
            .flatten();
        let price_to = errors
            .collect(parse_bound(PriceBound::To, params.price_to))
            .flatten();
        errors.into_result()?;

        let search_terms = params
            .search
            .as_deref()
            .map(search_terms)
            .unwrap_or_default();

        // Unknown ordering fields are ignored rather than rejected.
        let ordering: Vec<OrderTerm> = params
            .ordering
            .as_deref()
            .map(|raw| raw.split(',').filter_map(OrderTerm::parse).collect())
            .unwrap_or_default();

        Ok(ProductQuery {
            price_from,
            price_to,
            search_terms,
            ordering,
        })
    }
}

fn parse_bound(bound: PriceBound, raw: Option<String>) -> Result<Option<Decimal>, ValidationError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidNumber {
                field: bound.param(),
            }),
    }
}

fn search_terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

impl ProductQuery {
    pub fn price_bounds(&self) -> impl Iterator<Item = (PriceBound, Decimal)> + '_ {
        [
            (PriceBound::From, self.price_from),
            (PriceBound::To, self.price_to),
        ]
        .into_iter()
        .filter_map(|(bound, value)| value.map(|v| (bound, v)))
    }

    /// Every bound holds and every search term occurs, case-insensitively,
    /// in the title or the description.
    pub fn matches(&self, product: &Product) -> bool {
        let in_range = self
            .price_bounds()
            .all(|(bound, value)| bound.admits(value, product.price));
        if !in_range {
            return false;
        }

        let title = product.title.to_lowercase();
        let description = product.description.to_lowercase();
        self.search_terms.iter().all(|term| {
            let term = term.to_lowercase();
            title.contains(&term) || description.contains(&term)
        })
    }

    /// Requested ordering applied left to right, ascending id last.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        self.ordering
            .iter()
            .map(|term| {
                let ord = term.field.compare(a, b);
                match term.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, title: &str, description: &str, price: i64) -> Product {
        Product {
            id,
            title: title.into(),
            description: description.into(),
            price: Decimal::new(price, 0),
            image: None,
        }
    }

    fn query(params: ProductQueryParams) -> ProductQuery {
        ProductQuery::try_from(params).unwrap()
    }

    #[test]
    fn test_ordering_parses_known_fields_and_skips_others() {
        let q = query(ProductQueryParams {
            ordering: Some("-price, title,rating,".into()),
            ..Default::default()
        });

        assert_eq!(
            q.ordering,
            vec![
                OrderTerm {
                    field: OrderField::Price,
                    direction: Direction::Desc
                },
                OrderTerm {
                    field: OrderField::Title,
                    direction: Direction::Asc
                },
            ]
        );
    }

    #[test]
    fn test_invalid_price_bound_is_field_error() {
        let errors = ProductQuery::try_from(ProductQueryParams {
            price_from: Some("cheap".into()),
            price_to: Some("15000".into()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(errors.contains(&ValidationError::InvalidNumber {
            field: "price_from"
        }));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_empty_bound_is_open() {
        let q = query(ProductQueryParams {
            price_from: Some("".into()),
            price_to: Some("100".into()),
            ..Default::default()
        });

        assert_eq!(q.price_from, None);
        assert_eq!(q.price_to, Some(Decimal::new(100, 0)));
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let q = query(ProductQueryParams {
            price_from: Some("10000".into()),
            price_to: Some("15000".into()),
            ..Default::default()
        });

        assert!(q.matches(&product(1, "a", "b", 10000)));
        assert!(q.matches(&product(2, "a", "b", 15000)));
        assert!(!q.matches(&product(3, "a", "b", 9999)));
        assert!(!q.matches(&product(4, "a", "b", 15001)));
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let q = query(ProductQueryParams {
            search: Some("samsung 128gb".into()),
            ..Default::default()
        });

        assert!(q.matches(&product(1, "Samsung Galaxy", "128GB storage", 1)));
        assert!(!q.matches(&product(2, "Samsung Galaxy", "64GB storage", 1)));
        assert!(!q.matches(&product(3, "Apple Iphone", "128GB storage", 1)));
    }

    #[test]
    fn test_compare_breaks_ties_left_to_right_then_by_id() {
        let q = query(ProductQueryParams {
            ordering: Some("-price,title".into()),
            ..Default::default()
        });
        let mut products = vec![
            product(1, "b", "", 10),
            product(2, "a", "", 10),
            product(3, "c", "", 20),
            product(4, "a", "", 10),
        ];

        products.sort_by(|a, b| q.compare(a, b));
        let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_title_ordering_ignores_case_then_uses_bytes() {
        let q = query(ProductQueryParams {
            ordering: Some("title".into()),
            ..Default::default()
        });
        let mut products = vec![
            product(1, "banana", "", 1),
            product(2, "Cherry", "", 1),
            product(3, "apple", "", 1),
            product(4, "Apple", "", 1),
        ];

        products.sort_by(|a, b| q.compare(a, b));
        let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "apple", "banana", "Cherry"]);
    }
}
