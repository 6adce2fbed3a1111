use axum::{
    extract::Path,
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth;
use crate::database::{
    self,
    store::customers::{self, CustomerChanges, NewCustomer},
};
use crate::error::ApiError;
use crate::guards;
use crate::middleware::AuthUser;
use crate::schemas::{CustomerCreateInput, CustomerOut, CustomerUpdateInput};

/// POST /customers - register a new customer
pub async fn create(
    Json(input): Json<CustomerCreateInput>,
) -> Result<(StatusCode, Json<CustomerOut>), ApiError> {
    input.validate()?;

    let pool = database::pool().await?;

    let existing = customers::get_by_email(pool, &input.email).await?;
    guards::reject_if_exists(existing, "Customer already exists")?;

    let customer = customers::create(
        pool,
        NewCustomer {
            customer_name: input.customer_name,
            email: input.email,
            password: auth::hash_password(&input.password)?,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /customers/all - list every customer
pub async fn get_all() -> Result<Json<Vec<CustomerOut>>, ApiError> {
    let pool = database::pool().await?;
    let customers = customers::get_all(pool).await?;

    Ok(Json(customers.into_iter().map(CustomerOut::from).collect()))
}

/// GET /customers/me - the caller's own record
pub async fn me(user: AuthUser) -> Result<Json<CustomerOut>, ApiError> {
    let pool = database::pool().await?;

    let lookup = customers::get_by_id(pool, user.customer_id()).await?;
    let customer = guards::require_found(lookup, "Customer not found")?;

    Ok(Json(customer.into()))
}

/// PATCH /customers/:id - owner-only partial update
pub async fn update(
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<CustomerUpdateInput>,
) -> Result<Json<CustomerOut>, ApiError> {
    input.validate()?;

    // Ownership is checked before existence so a non-owner learns nothing
    guards::require_owner(id, &user.claims)?;

    let pool = database::pool().await?;

    let lookup = customers::get_by_id(pool, id).await?;
    let customer = guards::require_found(lookup, "Customer not found")?;

    if let Some(new_email) = &input.email {
        if new_email != &customer.email {
            let taken = customers::get_by_email(pool, new_email).await?;
            guards::reject_if_exists(taken, "Customer already exists")?;
        }
    }

    let password = match &input.password {
        Some(plaintext) => Some(auth::hash_password(plaintext)?),
        None => None,
    };

    let updated = customers::update(
        pool,
        &customer,
        CustomerChanges {
            customer_name: input.customer_name,
            email: input.email,
            password,
        },
    )
    .await?;

    Ok(Json(updated.into()))
}

/// DELETE /customers/:id - owner-only delete
pub async fn delete(user: AuthUser, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    guards::require_owner(id, &user.claims)?;

    let pool = database::pool().await?;

    let lookup = customers::get_by_id(pool, id).await?;
    let customer = guards::require_found(lookup, "Customer not found")?;

    customers::delete(pool, &customer).await?;

    Ok(StatusCode::NO_CONTENT)
}
