use axum::{
    extract::Path,
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::ROLE_ADMIN;
use crate::database::{
    self,
    store::{
        customers, items,
        orders::{self, NewOrder, OrderChanges},
    },
};
use crate::error::ApiError;
use crate::guards;
use crate::middleware::AuthUser;
use crate::schemas::{OrderCreateInput, OrderOut, OrderUpdateInput};

/// POST /orders - place an order for the authenticated customer
pub async fn create(
    user: AuthUser,
    Json(input): Json<OrderCreateInput>,
) -> Result<(StatusCode, Json<OrderOut>), ApiError> {
    input.validate()?;

    let pool = database::pool().await?;

    // The token subject can outlive its row; re-check before inserting
    let caller = customers::get_by_id(pool, user.customer_id()).await?;
    guards::require_found(caller, "Customer not found")?;

    let item_lookup = items::get_by_id(pool, input.item_id).await?;
    let item = guards::require_found(item_lookup, "Item not found")?;

    let order = orders::create(
        pool,
        NewOrder {
            customer_id: user.customer_id(),
            item_id: item.id,
            quantity: input.quantity,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/me - the caller's own orders
pub async fn me(user: AuthUser) -> Result<Json<Vec<OrderOut>>, ApiError> {
    let pool = database::pool().await?;
    let orders = orders::get_by_customer(pool, user.customer_id()).await?;

    Ok(Json(orders.into_iter().map(OrderOut::from).collect()))
}

/// GET /orders/all - admin-only listing across customers
pub async fn get_all(user: AuthUser) -> Result<Json<Vec<OrderOut>>, ApiError> {
    guards::require_role(&user.claims, ROLE_ADMIN)?;

    let pool = database::pool().await?;
    let orders = orders::get_all(pool).await?;

    Ok(Json(orders.into_iter().map(OrderOut::from).collect()))
}

/// GET /orders/:id - owner-only show
pub async fn get_by_id(user: AuthUser, Path(id): Path<Uuid>) -> Result<Json<OrderOut>, ApiError> {
    let pool = database::pool().await?;

    let lookup = orders::get_by_id(pool, id).await?;
    let order = guards::require_found(lookup, "Order not found")?;
    guards::require_owner(order.customer_id, &user.claims)?;

    Ok(Json(order.into()))
}

/// PATCH /orders/:id - owner-only partial update
pub async fn update(
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<OrderUpdateInput>,
) -> Result<Json<OrderOut>, ApiError> {
    input.validate()?;

    let pool = database::pool().await?;

    let lookup = orders::get_by_id(pool, id).await?;
    let order = guards::require_found(lookup, "Order not found")?;
    guards::require_owner(order.customer_id, &user.claims)?;

    if let Some(new_item_id) = input.item_id {
        let item = items::get_by_id(pool, new_item_id).await?;
        guards::require_found(item, "Item not found")?;
    }

    let updated = orders::update(
        pool,
        &order,
        OrderChanges {
            item_id: input.item_id,
            quantity: input.quantity,
        },
    )
    .await?;

    Ok(Json(updated.into()))
}

/// DELETE /orders/:id - owner-only delete
pub async fn delete(user: AuthUser, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    let pool = database::pool().await?;

    let lookup = orders::get_by_id(pool, id).await?;
    let order = guards::require_found(lookup, "Order not found")?;
    guards::require_owner(order.customer_id, &user.claims)?;

    orders::delete(pool, &order).await?;

    Ok(StatusCode::NO_CONTENT)
}
