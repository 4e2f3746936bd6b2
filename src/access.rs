//! Per-action authorization for products and reviews.
//!
//! [`check_action`] runs before a handler touches the store. Actions that
//! depend on who owns the target also call [`check_object`] once the
//! object has been loaded.

use uuid::Uuid;

use crate::{auth::Caller, errors::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Anyone,
    Authenticated,
    Admin,
    AuthorOrAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Unauthenticated,
    Forbidden,
}

pub fn requirement(resource: Resource, action: Action) -> Requirement {
    use Action::*;

    match (resource, action) {
        (Resource::Product, List | Retrieve) => Requirement::Anyone,
        (Resource::Product, Create | Update | PartialUpdate | Destroy) => Requirement::Admin,
        (Resource::Review, List | Retrieve) => Requirement::Anyone,
        (Resource::Review, Create) => Requirement::Authenticated,
        (Resource::Review, Update | PartialUpdate | Destroy) => Requirement::AuthorOrAdmin,
    }
}

/// `owner` is the author of the target object, when it is known. Without
/// it an author-or-admin action only demands an authenticated caller.
pub fn authorize(
    resource: Resource,
    action: Action,
    caller: &Caller,
    owner: Option<Uuid>,
) -> Decision {
    let (id, is_admin) = match (requirement(resource, action), caller) {
        (Requirement::Anyone, _) => return Decision::Allow,
        (_, Caller::Anonymous) => return Decision::Unauthenticated,
        (_, Caller::User { id, is_admin }) => (*id, *is_admin),
    };

    let allowed = match requirement(resource, action) {
        Requirement::Anyone | Requirement::Authenticated => true,
        Requirement::Admin => is_admin,
        Requirement::AuthorOrAdmin => is_admin || owner.is_none_or(|owner| owner == id),
    };

    if allowed { Decision::Allow } else { Decision::Forbidden }
}

fn into_result(decision: Decision) -> Result<(), AppError> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Unauthenticated => Err(AppError::Unauthorized(
            "Authentication credentials were not provided".into(),
        )),
        Decision::Forbidden => Err(AppError::Forbidden(
            "You do not have permission to perform this action".into(),
        )),
    }
}

pub fn check_action(resource: Resource, action: Action, caller: &Caller) -> Result<(), AppError> {
    into_result(authorize(resource, action, caller, None))
}

pub fn check_object(
    resource: Resource,
    action: Action,
    caller: &Caller,
    owner: Uuid,
) -> Result<(), AppError> {
    into_result(authorize(resource, action, caller, Some(owner)))
}
