//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O): the error
//! taxonomy, integer identifiers and their allocator, and the `Entity`
//! contract that lets generic collections key values by id.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{IdAllocator, OrderId, ProductId, WriteOffId};
