use tracing::{info, warn};

use stockroom_core::{OrderId, ProductId};
use stockroom_inventory::InventoryService;
use stockroom_sales::Order;

use crate::error::ServiceError;
use crate::store::OrderStore;

/// Outcome of a recorded order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderOutcome {
    pub order_id: OrderId,
    pub total_amount: f64,
    /// Lines whose product no longer exists, so no stock was deducted.
    pub missing_products: Vec<ProductId>,
}

/// Records orders and deducts the ordered stock.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderService;

impl OrderService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and persist `order`, then deduct each line from stock.
    ///
    /// Stock moves only after the order is stored; a failed save leaves the
    /// inventory untouched. Deductions clamp at zero instead of failing.
    /// An order without an id gets one from the store.
    pub fn create_order(
        &self,
        inventory: &mut InventoryService,
        store: &mut dyn OrderStore,
        mut order: Order,
    ) -> Result<OrderOutcome, ServiceError> {
        order.validate()?;
        order.calculate_total();
        let total_amount = order.total_amount();
        let lines: Vec<(ProductId, i32)> = order
            .items()
            .iter()
            .map(|item| (item.product_id, item.quantity))
            .collect();

        let order_id = store.add_order(order)?;

        let mut missing_products = Vec::new();
        for (product_id, quantity) in lines {
            if inventory.deduct_stock_saturating(product_id, quantity).is_none() {
                warn!(order_id = %order_id, product_id = %product_id, "ordered product not in inventory; no stock deducted");
                missing_products.push(product_id);
            }
        }

        info!(order_id = %order_id, total_amount, "order created");
        Ok(OrderOutcome {
            order_id,
            total_amount,
            missing_products,
        })
    }
}
