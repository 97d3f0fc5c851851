use tracing::{debug, info};

use stockroom_core::{DomainError, ProductId};
use stockroom_inventory::InventoryService;

use crate::error::ServiceError;
use crate::store::WriteOffLedger;

use super::write_off::WriteOffService;

/// Reason recorded for shortfalls found during a stock count.
pub const ADJUSTMENT_REASON: &str = "Inventory adjustment";

/// One counted line of a stock take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentRow {
    pub product_id: ProductId,
    pub system_quantity: i32,
    pub counted_quantity: i32,
}

impl AdjustmentRow {
    pub fn new(product_id: ProductId, system_quantity: i32, counted_quantity: i32) -> Self {
        Self {
            product_id,
            system_quantity,
            counted_quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjustmentResult {
    pub items_updated: usize,
    pub quantity_added: i64,
    pub quantity_written_off: i64,
}

/// Reconciles recorded stock against a physical count.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryAdjustmentService {
    write_offs: WriteOffService,
}

impl InventoryAdjustmentService {
    pub fn new(write_offs: WriteOffService) -> Self {
        Self { write_offs }
    }

    /// Apply each row in order: surplus is added to stock, shortfall is
    /// written off with [`ADJUSTMENT_REASON`].
    ///
    /// Rows are not applied as a unit. The first failing row stops the run
    /// and the rows before it stay applied.
    pub fn apply_adjustment(
        &self,
        inventory: &mut InventoryService,
        rows: &[AdjustmentRow],
        mut ledger: Option<&mut dyn WriteOffLedger>,
    ) -> Result<AdjustmentResult, ServiceError> {
        let mut result = AdjustmentResult::default();
        for row in rows {
            if row.counted_quantity < 0 {
                return Err(DomainError::invalid_quantity(format!(
                    "counted quantity for product {} cannot be negative",
                    row.product_id
                ))
                .into());
            }
            let delta = i64::from(row.counted_quantity) - i64::from(row.system_quantity);
            if delta == 0 {
                continue;
            }
            let units = i32::try_from(delta.abs()).map_err(|_| {
                DomainError::invalid_quantity(format!(
                    "adjustment of {delta} units for product {} is out of range",
                    row.product_id
                ))
            })?;

            if delta > 0 {
                inventory.add_stock(row.product_id, units)?;
                result.quantity_added += delta;
            } else {
                self.write_offs.write_off(
                    inventory,
                    row.product_id,
                    units,
                    ADJUSTMENT_REASON,
                    ledger.as_mut().map(|l| &mut **l as &mut dyn WriteOffLedger),
                )?;
                result.quantity_written_off += -delta;
            }
            result.items_updated += 1;
            debug!(product_id = %row.product_id, delta, "stock count applied");
        }

        info!(
            items_updated = result.items_updated,
            quantity_added = result.quantity_added,
            quantity_written_off = result.quantity_written_off,
            "inventory adjustment applied"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_products::Product;

    use crate::store::InMemoryWriteOffLedger;

    fn inventory() -> InventoryService {
        let mut inv = InventoryService::new();
        for (id, qty) in [(1, 10), (2, 10), (3, 10)] {
            inv.add_product(Product::new(ProductId::new(id), format!("P{id}"), "Misc", qty, 2.0).unwrap())
                .unwrap();
        }
        inv
    }

    #[test]
    fn surplus_shortfall_and_match() {
        let mut inv = inventory();
        let mut ledger = InMemoryWriteOffLedger::new();
        let rows = [
            AdjustmentRow::new(ProductId::new(1), 10, 14),
            AdjustmentRow::new(ProductId::new(2), 10, 7),
            AdjustmentRow::new(ProductId::new(3), 10, 10),
        ];

        let result = InventoryAdjustmentService::default()
            .apply_adjustment(&mut inv, &rows, Some(&mut ledger))
            .unwrap();

        assert_eq!(
            result,
            AdjustmentResult {
                items_updated: 2,
                quantity_added: 4,
                quantity_written_off: 3,
            }
        );
        assert_eq!(inv.get_product(ProductId::new(1)).unwrap().quantity(), 14);
        assert_eq!(inv.get_product(ProductId::new(2)).unwrap().quantity(), 7);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].reason, ADJUSTMENT_REASON);
        assert_eq!(ledger.records()[0].quantity, 3);
        assert_eq!(inv.write_off_history().len(), 1);
    }

    #[test]
    fn unknown_product_stops_the_run() {
        let mut inv = inventory();
        let rows = [
            AdjustmentRow::new(ProductId::new(1), 10, 12),
            AdjustmentRow::new(ProductId::new(99), 1, 0),
            AdjustmentRow::new(ProductId::new(2), 10, 15),
        ];

        let err = InventoryAdjustmentService::default()
            .apply_adjustment(&mut inv, &rows, None)
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(inv.get_product(ProductId::new(1)).unwrap().quantity(), 12);
        assert_eq!(inv.get_product(ProductId::new(2)).unwrap().quantity(), 10);
    }
}
