pub mod auth;
pub mod customers;
pub mod items;
pub mod orders;
