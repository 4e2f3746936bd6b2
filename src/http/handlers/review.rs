use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    access::{Action, Resource, check_action, check_object},
    auth::Caller,
    errors::{AppError, ErrorResponse},
    http::handlers::{json_body, path_id, reject},
    models::{NewReview, Review, ReviewDraft, ReviewPayload},
    state::AppState,
    validation::{ValidationError, ValidationErrors, validate_unique_review},
};

pub async fn create_review_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ErrorResponse> {
    check_action(Resource::Review, Action::Create, &caller).map_err(reject)?;
    let author = caller
        .user_id()
        .ok_or_else(|| reject(AppError::Unauthorized("Authentication required".into())))?;

    let payload = json_body(payload).map_err(reject)?;
    let draft = validate_review(&state, author, payload, None)
        .await
        .map_err(reject)?;

    let review = state
        .store
        .create_review(&NewReview::stamp(author, draft))
        .await
        .map_err(reject)?;

    tracing::info!(
        "Review {} created by {} for product {}",
        review.id,
        review.author,
        review.product
    );
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> Result<Json<Review>, ErrorResponse> {
    write_review(state, path, caller, payload, Action::Update).await
}

pub async fn partial_update_review_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> Result<Json<Review>, ErrorResponse> {
    write_review(state, path, caller, payload, Action::PartialUpdate).await
}

async fn write_review(
    state: AppState,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
    action: Action,
) -> Result<Json<Review>, ErrorResponse> {
    let existing = authorized_review(&state, path, &caller, action)
        .await
        .map_err(reject)?;
    let review_id = existing.id;

    let payload = json_body(payload).map_err(reject)?;
    let base = match action {
        Action::PartialUpdate => Some(&existing),
        _ => None,
    };
    // The pair in question is the stored author's, even when an admin edits.
    let draft = validate_review(&state, existing.author, payload, Some((&existing, base)))
        .await
        .map_err(reject)?;

    let review = state
        .store
        .update_review(review_id, &draft)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(review_not_found(review_id)))?;

    tracing::info!("Review {} updated", review.id);
    Ok(Json(review))
}

pub async fn delete_review_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    caller: Caller,
) -> Result<StatusCode, ErrorResponse> {
    let review_id = authorized_review(&state, path, &caller, Action::Destroy)
        .await
        .map_err(reject)?
        .id;

    if !state.store.delete_review(review_id).await.map_err(reject)? {
        return Err(reject(review_not_found(review_id)));
    }

    tracing::info!("Review {} deleted", review_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Authentication is checked before the lookup, ownership after it.
async fn authorized_review(
    state: &AppState,
    path: Result<Path<i32>, PathRejection>,
    caller: &Caller,
    action: Action,
) -> Result<Review, AppError> {
    check_action(Resource::Review, action, caller)?;
    let review_id = path_id(path, "Review")?;

    let review = state
        .store
        .get_review(review_id)
        .await?
        .ok_or_else(|| review_not_found(review_id))?;

    check_object(Resource::Review, action, caller, review.author)?;
    Ok(review)
}

/// Runs every field check and reports all failures together. `target` is
/// the review being rewritten and the base for absent fields, if any.
async fn validate_review(
    state: &AppState,
    author: Uuid,
    payload: ReviewPayload,
    target: Option<(&Review, Option<&Review>)>,
) -> Result<ReviewDraft, AppError> {
    let excluding = target.map(|(review, _)| review.id);
    let base = target.and_then(|(_, base)| base);
    let product = payload.product.or(base.map(|review| review.product));

    let drafted = payload.resolve(base);
    let mut errors = match &drafted {
        Ok(_) => ValidationErrors::default(),
        Err(errors) => errors.clone(),
    };
    if let Some(product) = product {
        if let Some(err) = check_product_slot(state, author, product, excluding).await? {
            errors.push(err);
        }
    }

    match drafted {
        Ok(draft) if errors.is_empty() => Ok(draft),
        _ => Err(errors.into()),
    }
}

/// The product must exist and `author` must not have reviewed it yet,
/// `excluding` the review being rewritten.
async fn check_product_slot(
    state: &AppState,
    author: Uuid,
    product: i32,
    excluding: Option<i32>,
) -> Result<Option<ValidationError>, AppError> {
    if state.store.get_product(product).await?.is_none() {
        return Ok(Some(ValidationError::UnknownProduct(product)));
    }

    let existing = state.store.list_reviews(product).await?;
    let unique = validate_unique_review(
        author,
        product,
        existing
            .iter()
            .filter(|review| Some(review.id) != excluding),
    );
    Ok(unique.err())
}

fn review_not_found(review_id: i32) -> AppError {
    AppError::NotFound(format!("Review {} not found", review_id))
}
