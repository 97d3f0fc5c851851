//! Store contracts for the three persisted collections.
//!
//! Each store is owned by one service per process; nothing here locks.
//! Implementations provide raw access and a `commit` that persists the full
//! collection, and the query and mutation helpers are shared defaults.

mod file;
mod memory;

pub use file::{FileStores, OrderFile, ProductFile, WriteOffFile};
pub use memory::{InMemoryOrderStore, InMemoryProductStore, InMemoryWriteOffLedger};

use chrono::NaiveDate;
use tracing::{debug, info};

use stockroom_core::{DomainError, IdAllocator, OrderId, ProductId, WriteOffId};
use stockroom_inventory::{InventoryService, WriteOffRecord};
use stockroom_products::Product;
use stockroom_sales::{Order, OrderType};

use crate::error::StoreError;

/// Canonical product set.
pub trait ProductStore {
    fn load_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Replace the stored set with `products`.
    fn save_products(&mut self, products: &[&Product]) -> Result<(), StoreError>;

    /// Insert `product`, or replace the stored product with the same id.
    fn upsert_product(&mut self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.load_products()?;
        match products.iter_mut().find(|p| p.same_identity(product)) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        let refs: Vec<&Product> = products.iter().collect();
        self.save_products(&refs)
    }

    /// Returns whether a product was removed.
    fn delete_product(&mut self, id: ProductId) -> Result<bool, StoreError> {
        let mut products = self.load_products()?;
        let before = products.len();
        products.retain(|p| p.id_typed() != id);
        if products.len() == before {
            return Ok(false);
        }
        let refs: Vec<&Product> = products.iter().collect();
        self.save_products(&refs)?;
        Ok(true)
    }

    /// Fill `inventory` from the store and seed its product id allocator.
    fn load_into(&self, inventory: &mut InventoryService) -> Result<usize, StoreError> {
        let products = self.load_products()?;
        let count = inventory.replace_products(products);
        info!(count, next_id = %inventory.next_product_id(), "inventory loaded");
        Ok(count)
    }

    fn save_inventory(&mut self, inventory: &InventoryService) -> Result<(), StoreError> {
        self.save_products(&inventory.get_all_products())
    }
}

/// Recorded orders.
pub trait OrderStore {
    fn orders(&self) -> &[Order];

    fn ids(&mut self) -> &mut IdAllocator;

    /// Persist `orders` as the complete order set. On error the store keeps
    /// its previous contents.
    fn commit(&mut self, orders: Vec<Order>) -> Result<(), StoreError>;

    fn allocate_id(&mut self) -> OrderId {
        OrderId::new(self.ids().allocate())
    }

    /// Record `order`, assigning an id first when it has none.
    fn add_order(&mut self, mut order: Order) -> Result<OrderId, StoreError> {
        if order.id_typed().is_valid() {
            let id = order.id_typed();
            if self.get_order(id).is_some() {
                return Err(DomainError::validation(format!("order {id} already exists")).into());
            }
            self.ids().reserve(id.get());
        } else {
            let id = self.allocate_id();
            order.set_id(id);
        }
        let id = order.id_typed();
        let mut orders = self.orders().to_vec();
        orders.push(order);
        self.commit(orders)?;
        debug!(order_id = %id, "order stored");
        Ok(id)
    }

    fn update_order(&mut self, order: Order) -> Result<(), StoreError> {
        let id = order.id_typed();
        let mut orders = self.orders().to_vec();
        let slot = orders
            .iter_mut()
            .find(|o| o.id_typed() == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id} not found")))?;
        *slot = order;
        self.commit(orders)
    }

    fn delete_order(&mut self, id: OrderId) -> Result<Order, StoreError> {
        let mut orders = self.orders().to_vec();
        let index = orders
            .iter()
            .position(|o| o.id_typed() == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id} not found")))?;
        let removed = orders.remove(index);
        self.commit(orders)?;
        Ok(removed)
    }

    fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.orders().iter().find(|o| o.id_typed() == id)
    }

    fn all_orders(&self) -> Vec<&Order> {
        self.orders().iter().collect()
    }

    /// Case-insensitive substring match on the company name.
    fn orders_by_company(&self, company: &str) -> Vec<&Order> {
        let needle = company.to_lowercase();
        self.orders()
            .iter()
            .filter(|o| o.company_name().to_lowercase().contains(&needle))
            .collect()
    }

    fn orders_by_type(&self, order_type: OrderType) -> Vec<&Order> {
        self.orders()
            .iter()
            .filter(|o| o.order_type() == order_type)
            .collect()
    }

    /// Orders dated within `from..=to`.
    fn orders_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Order> {
        self.orders()
            .iter()
            .filter(|o| (from..=to).contains(&o.order_date()))
            .collect()
    }
}

/// Append-only write-off ledger.
pub trait WriteOffLedger {
    fn records(&self) -> &[WriteOffRecord];

    /// Persist `records` as the complete ledger. On error the ledger keeps
    /// its previous contents.
    fn commit(&mut self, records: Vec<WriteOffRecord>) -> Result<(), StoreError>;

    /// Largest recorded id plus one, or 1 for an empty ledger.
    fn next_id(&self) -> WriteOffId {
        let max = self.records().iter().map(|r| r.id.get()).max();
        WriteOffId::new(IdAllocator::after(max).peek())
    }

    /// Append a record. Empty names and reasons get placeholder text.
    fn append(
        &mut self,
        product_id: ProductId,
        quantity: i32,
        value: f64,
        reason: &str,
        product_name: &str,
    ) -> Result<WriteOffRecord, StoreError> {
        let record = WriteOffRecord::new(
            self.next_id(),
            product_id,
            product_name,
            quantity,
            value,
            reason,
        )?;
        let mut records = self.records().to_vec();
        records.push(record.clone());
        self.commit(records)?;
        debug!(write_off_id = %record.id, product_id = %product_id, quantity, "write-off recorded");
        Ok(record)
    }

    /// Newest first.
    fn history(&self) -> Vec<&WriteOffRecord> {
        let mut records: Vec<&WriteOffRecord> = self.records().iter().collect();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records
    }

    fn total_value(&self) -> f64 {
        self.records().iter().map(|r| r.value).sum()
    }
}
