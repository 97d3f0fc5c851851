//! Inventory domain module.
//!
//! This crate contains the stock rules for the canonical product set and the
//! write-off bookkeeping, implemented purely as deterministic domain logic
//! (no IO, no storage).

pub mod filter;
pub mod service;
pub mod write_off;

pub use filter::{ALL_CATEGORIES, filter_products};
pub use service::{InventoryService, WriteOffReceipt};
pub use write_off::{WriteOffHistoryEntry, WriteOffRecord};
