use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    access::{Action, Resource, check_action},
    auth::Caller,
    errors::{AppError, ErrorResponse},
    http::handlers::{json_body, path_id, query_params, reject},
    models::{
        Product, ProductDetail, ProductPayload, ProductQuery, ProductQueryParams, ProductSummary,
        Review,
    },
    state::AppState,
};

pub async fn list_products_handler(
    State(state): State<AppState>,
    caller: Caller,
    params: Result<Query<ProductQueryParams>, QueryRejection>,
) -> Result<Json<Vec<ProductSummary>>, ErrorResponse> {
    check_action(Resource::Product, Action::List, &caller).map_err(reject)?;

    let query = query_params(params)
        .and_then(|params| ProductQuery::try_from(params).map_err(AppError::from))
        .map_err(reject)?;
    let products = state.store.list_products(&query).await.map_err(reject)?;

    Ok(Json(products.iter().map(ProductSummary::from).collect()))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
) -> Result<Json<ProductDetail>, ErrorResponse> {
    check_action(Resource::Product, Action::Retrieve, &caller).map_err(reject)?;

    let product_id = path_id(path, "Product").map_err(reject)?;
    let product = find_product(&state, product_id).await.map_err(reject)?;

    Ok(Json(ProductDetail::from(&product)))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ErrorResponse> {
    check_action(Resource::Product, Action::Create, &caller).map_err(reject)?;

    let new = json_body(payload)
        .and_then(|payload| payload.into_new().map_err(AppError::from))
        .map_err(reject)?;
    let product = state.store.create_product(&new).await.map_err(reject)?;

    tracing::info!("Product created: {} (ID: {})", product.title, product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, ErrorResponse> {
    write_product(state, path, caller, payload, Action::Update).await
}

pub async fn partial_update_product_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, ErrorResponse> {
    write_product(state, path, caller, payload, Action::PartialUpdate).await
}

async fn write_product(
    state: AppState,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
    payload: Result<Json<ProductPayload>, JsonRejection>,
    action: Action,
) -> Result<Json<Product>, ErrorResponse> {
    check_action(Resource::Product, action, &caller).map_err(reject)?;

    let product_id = path_id(path, "Product").map_err(reject)?;
    let existing = find_product(&state, product_id).await.map_err(reject)?;
    let payload = json_body(payload).map_err(reject)?;
    let changes = match action {
        Action::PartialUpdate => payload.apply_to(&existing),
        _ => payload.into_new(),
    }
    .map_err(AppError::from)
    .map_err(reject)?;

    let product = state
        .store
        .update_product(product_id, &changes)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(product_not_found(product_id)))?;

    tracing::info!("Product updated: {} (ID: {})", product.title, product.id);
    Ok(Json(product))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
) -> Result<StatusCode, ErrorResponse> {
    check_action(Resource::Product, Action::Destroy, &caller).map_err(reject)?;

    let product_id = path_id(path, "Product").map_err(reject)?;
    if !state
        .store
        .delete_product(product_id)
        .await
        .map_err(reject)?
    {
        return Err(reject(product_not_found(product_id)));
    }

    tracing::info!("Product deleted: {}", product_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn product_reviews_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
) -> Result<Json<Vec<Review>>, ErrorResponse> {
    check_action(Resource::Review, Action::List, &caller).map_err(reject)?;

    let product_id = path_id(path, "Product").map_err(reject)?;
    let product = find_product(&state, product_id).await.map_err(reject)?;
    let reviews = state.store.list_reviews(product.id).await.map_err(reject)?;

    Ok(Json(reviews))
}

async fn find_product(state: &AppState, product_id: i32) -> Result<Product, AppError> {
    state
        .store
        .get_product(product_id)
        .await?
        .ok_or_else(|| product_not_found(product_id))
}

fn product_not_found(product_id: i32) -> AppError {
    AppError::NotFound(format!("Product {} not found", product_id))
}
