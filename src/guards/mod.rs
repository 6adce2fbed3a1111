//! Composable pre-handler checks.
//!
//! Each guard takes request data (and optionally the authenticated claims)
//! and either passes a value through or fails with a specific `ApiError`.
//! Guards compose left-to-right with `?`; the first failure aborts the
//! request. None has side effects beyond read-only lookups.

use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Fail with AlreadyExists when a uniqueness lookup came back non-empty
pub fn reject_if_exists<T>(lookup: Option<T>, detail: &str) -> Result<(), ApiError> {
    match lookup {
        Some(_) => Err(ApiError::already_exists(detail)),
        None => Ok(()),
    }
}

/// Fail with NotFound when a lookup came back empty, otherwise pass the
/// entity through
pub fn require_found<T>(lookup: Option<T>, detail: &str) -> Result<T, ApiError> {
    lookup.ok_or_else(|| ApiError::not_found(detail))
}

/// Fail with InvalidCredentials unless the candidate password matches the
/// stored hash
pub fn require_password_match(candidate: &str, stored_hash: &str) -> Result<(), ApiError> {
    if auth::verify_password(candidate, stored_hash)? {
        Ok(())
    } else {
        Err(ApiError::invalid_credentials("Invalid password or email"))
    }
}

/// Fail unless the caller owns the resource. Admins pass regardless.
pub fn require_owner(resource_owner_id: Uuid, claims: &Claims) -> Result<(), ApiError> {
    if claims.sub == resource_owner_id || claims.is_admin() {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Not the owner of this resource"))
    }
}

/// Fail unless the caller's token carries the given role
pub fn require_role(claims: &Claims, role: &str) -> Result<(), ApiError> {
    if claims.role == role {
        Ok(())
    } else {
        Err(ApiError::unauthorized(format!("Requires {} role", role)))
    }
}
