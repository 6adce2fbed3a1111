//! Data-access layer mediating all reads and writes to persisted entities.
//!
//! Every mutating operation runs inside a transaction; on any persistence
//! failure the transaction is rolled back in full before the error surfaces,
//! so partial writes are never observable.

pub mod customers;
pub mod items;
pub mod orders;
