use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Customer;
use crate::database::StoreError;

const COLUMNS: &str = "id, customer_name, email, password, created_at, updated_at";

/// Insert payload. `password` is already hashed by the caller.
#[derive(Debug)]
pub struct NewCustomer {
    pub customer_name: String,
    pub email: String,
    pub password: String,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct CustomerChanges {
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn create(pool: &PgPool, new: NewCustomer) -> Result<Customer, StoreError> {
    let mut tx = pool.begin().await?;

    let customer = sqlx::query_as::<_, Customer>(&format!(
        "INSERT INTO customers (id, customer_name, email, password)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&new.customer_name)
    .bind(&new.email)
    .bind(&new.password)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(customer)
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Customer>, StoreError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {COLUMNS} FROM customers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<Customer>, StoreError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {COLUMNS} FROM customers WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

pub async fn get_all(pool: &PgPool) -> Result<Vec<Customer>, StoreError> {
    let customers = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {COLUMNS} FROM customers ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(customers)
}

/// Apply a partial update. Unset fields keep their current value;
/// `updated_at` is bumped server-side.
pub async fn update(
    pool: &PgPool,
    existing: &Customer,
    changes: CustomerChanges,
) -> Result<Customer, StoreError> {
    let mut tx = pool.begin().await?;

    let customer = sqlx::query_as::<_, Customer>(&format!(
        "UPDATE customers
         SET customer_name = COALESCE($2, customer_name),
             email = COALESCE($3, email),
             password = COALESCE($4, password),
             updated_at = now()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(existing.id)
    .bind(changes.customer_name)
    .bind(changes.email)
    .bind(changes.password)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(customer)
}

pub async fn delete(pool: &PgPool, existing: &Customer) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *tx)
        .await?;

    // Row can vanish between the guard lookup and the delete
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound("Customer not found".to_string()));
    }

    tx.commit().await?;
    Ok(())
}
