use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    errors::AppError,
    models::{
        Product, ProductQuery,
        query::SEARCH_COLUMNS,
    },
};

pub async fn get_product(id: i32, postgres: &PgPool) -> Result<Option<Product>, AppError> {
    sqlx::query_as::<_, Product>(
        "SELECT id, title, description, price, image
        FROM products
        WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch product: {}", e)))
}

pub async fn list_products(
    query: &ProductQuery,
    postgres: &PgPool,
) -> Result<Vec<Product>, AppError> {
    let mut builder = list_products_query(query);
    tracing::debug!("Listing products: {}", builder.sql());

    builder
        .build_query_as::<Product>()
        .fetch_all(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list products: {}", e)))
}

fn list_products_query(query: &ProductQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT id, title, description, price, image FROM products WHERE TRUE",
    );

    for (bound, value) in query.price_bounds() {
        builder
            .push(" AND ")
            .push(bound.column())
            .push(" ")
            .push(bound.operator())
            .push(" ")
            .push_bind(value);
    }

    for term in &query.search_terms {
        let pattern = like_pattern(term);
        builder.push(" AND (");
        for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(*column)
                .push(" ILIKE ")
                .push_bind(pattern.clone());
        }
        builder.push(")");
    }

    builder.push(" ORDER BY ");
    for term in &query.ordering {
        for key in term.field.sort_keys() {
            builder
                .push(*key)
                .push(" ")
                .push(term.direction.keyword())
                .push(", ");
        }
    }
    builder.push("id ASC");

    builder
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductQueryParams;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("apple"), "%apple%");
    }

    #[test]
    fn test_list_query_maps_filters_to_columns() {
        let query = ProductQuery::try_from(ProductQueryParams {
            price_from: Some("10000".into()),
            price_to: Some("15000".into()),
            search: Some("apple".into()),
            ordering: Some("-price,title".into()),
        })
        .unwrap();

        let builder = list_products_query(&query);
        assert_eq!(
            builder.sql(),
            "SELECT id, title, description, price, image FROM products WHERE TRUE \
            AND price >= $1 AND price <= $2 \
            AND (title ILIKE $3 OR description ILIKE $4) \
            ORDER BY price DESC, LOWER(title) COLLATE \"C\" ASC, title COLLATE \"C\" ASC, id ASC"
        );
    }

    #[test]
    fn test_unfiltered_query_orders_by_id() {
        let builder = list_products_query(&ProductQuery::default());
        assert!(builder.sql().ends_with("WHERE TRUE ORDER BY id ASC"));
    }
}
