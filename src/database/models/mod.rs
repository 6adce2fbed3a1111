pub mod customer;
pub mod item;
pub mod order;

pub use customer::Customer;
pub use item::Item;
pub use order::Order;
