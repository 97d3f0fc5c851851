//! Products domain module.
//!
//! This crate contains the product entity and the indexed repository that owns
//! the canonical product set, implemented purely as deterministic domain logic
//! (no IO, no storage).

pub mod product;
pub mod repository;

pub use product::{Product, ProductKind};
pub use repository::{Catalogued, Repository};
