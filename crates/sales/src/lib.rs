//! Sales orders domain module.
//!
//! This crate contains business rules for retail/wholesale orders, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod discount;
pub mod order;
pub mod summary;

pub use discount::discount_percent;
pub use order::{Order, OrderItem, OrderType};
pub use summary::SalesSummary;
