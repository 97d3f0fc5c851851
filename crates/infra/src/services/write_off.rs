use tracing::{debug, info, warn};

use stockroom_core::ProductId;
use stockroom_inventory::{InventoryService, WriteOffReceipt, WriteOffRecord};

use crate::error::ServiceError;
use crate::store::WriteOffLedger;

#[derive(Debug, Clone, PartialEq)]
pub struct WriteOffOutcome {
    pub receipt: WriteOffReceipt,
    /// Quantity times the unit price before the write-off.
    pub value: f64,
    /// The ledger entry, when one was written.
    pub record: Option<WriteOffRecord>,
    pub ledger_saved: bool,
}

/// Writes stock off and records it in the ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteOffService;

impl WriteOffService {
    pub fn new() -> Self {
        Self
    }

    /// Write off `quantity` units of `product_id`.
    ///
    /// A ledger that fails to append is logged and reported through
    /// [`WriteOffOutcome::ledger_saved`]; the stock change stays applied.
    pub fn write_off(
        &self,
        inventory: &mut InventoryService,
        product_id: ProductId,
        quantity: i32,
        reason: &str,
        ledger: Option<&mut dyn WriteOffLedger>,
    ) -> Result<WriteOffOutcome, ServiceError> {
        let receipt = inventory.write_off_product(product_id, quantity, reason)?;
        let value = receipt.value();

        let record = match ledger {
            None => None,
            Some(_) if quantity == 0 => {
                debug!(product_id = %product_id, "nothing written off; ledger untouched");
                None
            }
            Some(ledger) => {
                match ledger.append(product_id, quantity, value, reason, &receipt.product_name) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!(product_id = %product_id, quantity, error = %err, "write-off applied but not recorded in ledger");
                        None
                    }
                }
            }
        };

        info!(product_id = %product_id, quantity, value, ledger_saved = record.is_some(), "write-off completed");
        Ok(WriteOffOutcome {
            ledger_saved: record.is_some(),
            receipt,
            value,
            record,
        })
    }
}
