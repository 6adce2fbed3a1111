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
    store::items::{self, ItemChanges, NewItem},
};
use crate::error::ApiError;
use crate::guards;
use crate::middleware::AuthUser;
use crate::schemas::{ItemCreateInput, ItemOut, ItemUpdateInput};

/// POST /items - admin-only create
pub async fn create(
    user: AuthUser,
    Json(input): Json<ItemCreateInput>,
) -> Result<(StatusCode, Json<ItemOut>), ApiError> {
    guards::require_role(&user.claims, ROLE_ADMIN)?;
    input.validate()?;

    let pool = database::pool().await?;

    let existing = items::get_by_name(pool, &input.item_name).await?;
    guards::reject_if_exists(existing, "Item already exists")?;

    let item = items::create(
        pool,
        NewItem {
            item_name: input.item_name,
            price: input.price,
            quantity: input.quantity,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /items/all - list every item
pub async fn get_all() -> Result<Json<Vec<ItemOut>>, ApiError> {
    let pool = database::pool().await?;
    let items = items::get_all(pool).await?;

    Ok(Json(items.into_iter().map(ItemOut::from).collect()))
}

/// GET /items/:id - show one item
pub async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<ItemOut>, ApiError> {
    let pool = database::pool().await?;

    let lookup = items::get_by_id(pool, id).await?;
    let item = guards::require_found(lookup, "Item not found")?;

    Ok(Json(item.into()))
}

/// PATCH /items/:id - admin-only partial update
pub async fn update(
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ItemUpdateInput>,
) -> Result<Json<ItemOut>, ApiError> {
    guards::require_role(&user.claims, ROLE_ADMIN)?;
    input.validate()?;

    let pool = database::pool().await?;

    let lookup = items::get_by_id(pool, id).await?;
    let item = guards::require_found(lookup, "Item not found")?;

    if let Some(new_name) = &input.item_name {
        if new_name != &item.item_name {
            let taken = items::get_by_name(pool, new_name).await?;
            guards::reject_if_exists(taken, "Item already exists")?;
        }
    }

    let updated = items::update(
        pool,
        &item,
        ItemChanges {
            item_name: input.item_name,
            price: input.price,
            quantity: input.quantity,
        },
    )
    .await?;

    Ok(Json(updated.into()))
}

/// DELETE /items/:id - admin-only delete
pub async fn delete(user: AuthUser, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    guards::require_role(&user.claims, ROLE_ADMIN)?;

    let pool = database::pool().await?;

    let lookup = items::get_by_id(pool, id).await?;
    let item = guards::require_found(lookup, "Item not found")?;

    items::delete(pool, &item).await?;

    Ok(StatusCode::NO_CONTENT)
}
