//! In-memory stores for tests and embedding.
//!
//! Each can be switched into a failing mode where every write returns an
//! i/o error, to exercise the paths that must not mutate state on a failed
//! save.

use std::io;

use stockroom_core::IdAllocator;
use stockroom_inventory::WriteOffRecord;
use stockroom_products::Product;
use stockroom_sales::Order;

use crate::error::StoreError;

use super::{OrderStore, ProductStore, WriteOffLedger};

const MEMORY_PATH: &str = "<memory>";

fn refuse(fail_writes: bool) -> Result<(), StoreError> {
    if fail_writes {
        return Err(StoreError::io(
            MEMORY_PATH,
            io::Error::other("store is in failing mode"),
        ));
    }
    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    products: Vec<Product>,
    fail_writes: bool,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl ProductStore for InMemoryProductStore {
    fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.clone())
    }

    fn save_products(&mut self, products: &[&Product]) -> Result<(), StoreError> {
        refuse(self.fail_writes)?;
        self.products = products.iter().map(|p| (*p).clone()).collect();
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Vec<Order>,
    ids: IdAllocator,
    fail_writes: bool,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl OrderStore for InMemoryOrderStore {
    fn orders(&self) -> &[Order] {
        &self.orders
    }

    fn ids(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    fn commit(&mut self, orders: Vec<Order>) -> Result<(), StoreError> {
        refuse(self.fail_writes)?;
        self.orders = orders;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryWriteOffLedger {
    records: Vec<WriteOffRecord>,
    fail_writes: bool,
}

impl InMemoryWriteOffLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl WriteOffLedger for InMemoryWriteOffLedger {
    fn records(&self) -> &[WriteOffRecord] {
        &self.records
    }

    fn commit(&mut self, records: Vec<WriteOffRecord>) -> Result<(), StoreError> {
        refuse(self.fail_writes)?;
        self.records = records;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ProductId;

    #[test]
    fn failing_ledger_keeps_previous_records() {
        let mut ledger = InMemoryWriteOffLedger::new();
        ledger.append(ProductId::new(1), 1, 1.0, "a", "Pen").unwrap();
        ledger.set_fail_writes(true);
        let err = ledger.append(ProductId::new(1), 1, 1.0, "b", "Pen").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn load_into_seeds_allocator() {
        let mut store = InMemoryProductStore::new();
        let a = Product::new(ProductId::new(4), "A", "X", 1, 1.0).unwrap();
        let b = Product::new(ProductId::new(9), "B", "X", 1, 1.0).unwrap();
        store.save_products(&[&a, &b]).unwrap();

        let mut inventory = stockroom_inventory::InventoryService::new();
        assert_eq!(store.load_into(&mut inventory).unwrap(), 2);
        assert_eq!(inventory.next_product_id(), ProductId::new(10));
    }
}
