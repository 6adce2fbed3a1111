use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Item;
use crate::database::StoreError;

const COLUMNS: &str = "id, item_name, price, quantity, created_at, updated_at";

#[derive(Debug)]
pub struct NewItem {
    pub item_name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct ItemChanges {
    pub item_name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

pub async fn create(pool: &PgPool, new: NewItem) -> Result<Item, StoreError> {
    let mut tx = pool.begin().await?;

    let item = sqlx::query_as::<_, Item>(&format!(
        "INSERT INTO items (id, item_name, price, quantity)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&new.item_name)
    .bind(new.price)
    .bind(new.quantity)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(item)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Item>, StoreError> {
    let item = sqlx::query_as::<_, Item>(&format!("SELECT {COLUMNS} FROM items WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

pub async fn get_by_name(pool: &PgPool, item_name: &str) -> Result<Option<Item>, StoreError> {
    let item = sqlx::query_as::<_, Item>(&format!(
        "SELECT {COLUMNS} FROM items WHERE item_name = $1"
    ))
    .bind(item_name)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Item>, StoreError> {
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT {COLUMNS} FROM items ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn update(
    pool: &PgPool,
    existing: &Item,
    changes: ItemChanges,
) -> Result<Item, StoreError> {
    let mut tx = pool.begin().await?;

    let item = sqlx::query_as::<_, Item>(&format!(
        "UPDATE items
         SET item_name = COALESCE($2, item_name),
             price = COALESCE($3, price),
             quantity = COALESCE($4, quantity),
             updated_at = now()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(existing.id)
    .bind(changes.item_name)
    .bind(changes.price)
    .bind(changes.quantity)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(item)
}

pub async fn delete(pool: &PgPool, existing: &Item) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("Item not found".to_string()));
    }

    tx.commit().await?;
    Ok(())
}
