//! Request and response schemas.
//!
//! Inputs are validated declaratively with `validator`; outputs are explicit
//! projections so timestamps always render in one fixed format and password
//! fields can never leak.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::database::models::{Customer, Item, Order};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price_negative"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerCreateInput {
    #[validate(length(min = 1, max = 30))]
    pub customer_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 30))]
    pub password: String,
}

/// Partial update: omitted fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CustomerUpdateInput {
    #[validate(length(min = 1, max = 30))]
    pub customer_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 30))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 30))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerOut {
    pub id: Uuid,
    pub customer_name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerOut {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            customer_name: customer.customer_name,
            email: customer.email,
            created_at: format_timestamp(customer.created_at),
            updated_at: format_timestamp(customer.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginOut {
    pub customer: CustomerOut,
    pub access_token: String,
    pub token_type: &'static str,
}

impl LoginOut {
    pub fn new(customer: Customer, access_token: String) -> Self {
        Self {
            customer: customer.into(),
            access_token,
            token_type: "bearer",
        }
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct ItemCreateInput {
    #[validate(length(min = 1, max = 30))]
    pub item_name: String,
    #[validate(custom(function = non_negative_price))]
    #[serde(default)]
    pub price: Decimal,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ItemUpdateInput {
    #[validate(length(min = 1, max = 30))]
    pub item_name: Option<String>,
    #[validate(custom(function = non_negative_price))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ItemOut {
    pub id: Uuid,
    pub item_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Item> for ItemOut {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            item_name: item.item_name,
            price: item.price,
            quantity: item.quantity,
            created_at: format_timestamp(item.created_at),
            updated_at: format_timestamp(item.updated_at),
        }
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct OrderCreateInput {
    pub item_id: Uuid,
    #[validate(range(min = 1))]
    #[serde(default = "default_order_quantity")]
    pub quantity: i32,
}

fn default_order_quantity() -> i32 {
    1
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct OrderUpdateInput {
    pub item_id: Option<Uuid>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct OrderOut {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderOut {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            item_id: order.item_id,
            quantity: order.quantity,
            created_at: format_timestamp(order.created_at),
            updated_at: format_timestamp(order.updated_at),
        }
    }
}
