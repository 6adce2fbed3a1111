use axum::Json;
use validator::Validate;

use crate::auth::{self, Claims, ROLE_ADMIN, ROLE_CUSTOMER};
use crate::config;
use crate::database::{self, store::customers};
use crate::error::ApiError;
use crate::guards;
use crate::schemas::{LoginInput, LoginOut};

/// POST /login - verify email + password, return the customer and a signed
/// bearer token
pub async fn login(Json(input): Json<LoginInput>) -> Result<Json<LoginOut>, ApiError> {
    input.validate()?;

    let pool = database::pool().await?;

    // A missing email and a wrong password must be indistinguishable
    let customer = customers::get_by_email(pool, &input.email)
        .await?
        .ok_or_else(|| ApiError::invalid_credentials("Invalid password or email"))?;

    guards::require_password_match(&input.password, &customer.password)?;

    let role = match &config::config().security.admin_email {
        Some(admin_email) if admin_email == &customer.email => ROLE_ADMIN,
        _ => ROLE_CUSTOMER,
    };

    let claims = Claims::new(customer.id, role);
    let token = auth::generate_token(&claims)?;

    tracing::info!(customer_id = %customer.id, role, "login succeeded");

    Ok(Json(LoginOut::new(customer, token)))
}
