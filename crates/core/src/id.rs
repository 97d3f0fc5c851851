//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are positive 32-bit integers because that is their width in the
//! on-disk record layout.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product in the canonical product set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

/// Identifier of a customer order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i32);

/// Identifier of a write-off ledger entry (independent of product ids).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteOffId(i32);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i32 {
                self.0
            }

            /// Ids handed out by an allocator are always positive.
            pub const fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i32> for $t {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i32 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i32>()
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

impl_int_newtype!(ProductId, "ProductId");
impl_int_newtype!(OrderId, "OrderId");
impl_int_newtype!(WriteOffId, "WriteOffId");

/// Monotonic id allocator for one entity kind.
///
/// Owned by whichever store or service creates entities of that kind; loaders
/// seed it from the largest id they observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: i32,
}

impl IdAllocator {
    /// A fresh allocator whose first id is `1`.
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocator positioned after `max_id` (`max_id + 1`, or `1` when nothing
    /// was observed).
    pub fn after(max_id: Option<i32>) -> Self {
        let mut alloc = Self::new();
        if let Some(max) = max_id {
            alloc.reserve(max);
        }
        alloc
    }

    /// Peek at the id the next call to [`IdAllocator::allocate`] returns.
    pub const fn peek(&self) -> i32 {
        self.next
    }

    pub fn allocate(&mut self) -> i32 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// Make sure `id` is never handed out again.
    pub fn reserve(&mut self, id: i32) {
        if id >= self.next {
            self.next = id.saturating_add(1);
        }
    }

    /// Re-seed from the maximum id observed in a freshly loaded collection.
    pub fn reset_after(&mut self, max_id: Option<i32>) {
        *self = Self::after(max_id);
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_starts_at_one() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.allocate(), 1);
        assert_eq!(alloc.allocate(), 2);
    }

    #[test]
    fn allocator_after_max_observed_id() {
        assert_eq!(IdAllocator::after(Some(41)).peek(), 42);
        assert_eq!(IdAllocator::after(None).peek(), 1);
    }

    #[test]
    fn reserve_only_moves_forward() {
        let mut alloc = IdAllocator::after(Some(10));
        alloc.reserve(3);
        assert_eq!(alloc.peek(), 11);
        alloc.reserve(20);
        assert_eq!(alloc.allocate(), 21);
    }

    #[test]
    fn ids_parse_and_display() {
        let id: ProductId = " 17 ".parse().unwrap();
        assert_eq!(id, ProductId::new(17));
        assert_eq!(id.to_string(), "17");
        assert!(id.is_valid());
        assert!(!ProductId::new(0).is_valid());

        let err = "abc".parse::<OrderId>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("OrderId")));
    }
}
