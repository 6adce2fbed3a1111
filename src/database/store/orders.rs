use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Order;
use crate::database::StoreError;

const COLUMNS: &str = "id, customer_id, item_id, quantity, created_at, updated_at";

/// Insert payload. Referential checks (customer and item exist) are the
/// caller's guard chain; the FK constraints are the backstop.
#[derive(Debug)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct OrderChanges {
    pub item_id: Option<Uuid>,
    pub quantity: Option<i32>,
}

pub async fn create(pool: &PgPool, new: NewOrder) -> Result<Order, StoreError> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders (id, customer_id, item_id, quantity)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(new.customer_id)
    .bind(new.item_id)
    .bind(new.quantity)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Order>, StoreError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Order>, StoreError> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

/// All orders owned by one customer, oldest first
pub async fn get_by_customer(pool: &PgPool, customer_id: Uuid) -> Result<Vec<Order>, StoreError> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at"
    ))
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn update(
    pool: &PgPool,
    existing: &Order,
    changes: OrderChanges,
) -> Result<Order, StoreError> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders
         SET item_id = COALESCE($2, item_id),
             quantity = COALESCE($3, quantity),
             updated_at = now()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(existing.id)
    .bind(changes.item_id)
    .bind(changes.quantity)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn delete(pool: &PgPool, existing: &Order) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("Order not found".to_string()));
    }

    tx.commit().await?;
    Ok(())
}
