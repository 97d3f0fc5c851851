//! Write-off bookkeeping: history snapshots, ledger records, and the value
//! calculations reports are built from.

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId, WriteOffId};
use stockroom_products::Product;

/// Reason stored when the caller supplies none.
pub const DEFAULT_REASON: &str = "No reason provided";
/// Product name stored when the caller supplies none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
/// Reason attached to records generated from the in-memory history.
pub const REPORT_REASON: &str = "Damaged or written off";

/// In-memory history entry: the product as it was at write-off time, with
/// its quantity set to the amount written off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteOffHistoryEntry {
    pub product: Product,
    pub reason: String,
}

impl WriteOffHistoryEntry {
    pub fn snapshot(product: &Product, quantity: i32, reason: &str) -> DomainResult<Self> {
        let mut product = product.clone();
        product.set_quantity(quantity)?;
        Ok(Self {
            product,
            reason: reason.to_string(),
        })
    }

    /// Monetary value of the written-off units.
    pub fn value(&self) -> f64 {
        self.product.total_value()
    }
}

/// Ledger entry. Append-only; captures the product name so the history
/// survives later renames and deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOffRecord {
    pub id: WriteOffId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub value: f64,
    pub reason: String,
}

impl WriteOffRecord {
    /// Build a record, substituting placeholders for an empty reason or name.
    pub fn new(
        id: WriteOffId,
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: i32,
        value: f64,
        reason: impl Into<String>,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(format!(
                "write-off quantity must be positive (got {quantity})"
            )));
        }
        let product_name = non_empty_or(product_name.into(), UNKNOWN_PRODUCT);
        let reason = non_empty_or(reason.into(), DEFAULT_REASON);
        Ok(Self {
            id,
            product_id,
            product_name,
            quantity,
            value,
            reason,
        })
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Value of writing off `quantity` units of `product`; zero when the
/// quantity is negative or exceeds the stock on hand.
pub fn write_off_value(product: &Product, quantity: i32) -> f64 {
    if quantity < 0 || quantity > product.quantity() {
        return 0.0;
    }
    f64::from(quantity) * product.unit_price()
}

pub fn total_write_off_value(history: &[WriteOffHistoryEntry]) -> f64 {
    history.iter().map(WriteOffHistoryEntry::value).sum()
}

/// Damaged stock is written off once more than half of it is damaged.
/// Percentages outside `0..=100` are rejected.
pub fn should_write_off_damaged(damage_percent: f64) -> bool {
    if !(0.0..=100.0).contains(&damage_percent) {
        return false;
    }
    damage_percent > 50.0
}

/// Turn the in-memory history into ledger-shaped records numbered from 1.
///
/// Entries with nothing written off are skipped.
pub fn generate_report(history: &[WriteOffHistoryEntry]) -> Vec<WriteOffRecord> {
    history
        .iter()
        .filter(|entry| entry.product.quantity() > 0)
        .zip(1..)
        .filter_map(|(entry, id)| {
            WriteOffRecord::new(
                WriteOffId::new(id),
                entry.product.id_typed(),
                entry.product.name(),
                entry.product.quantity(),
                entry.value(),
                REPORT_REASON,
            )
            .ok()
        })
        .collect()
}
