//! Stores backed by the live binary files.

use std::path::{Path, PathBuf};

use tracing::info;

use stockroom_core::IdAllocator;
use stockroom_inventory::WriteOffRecord;
use stockroom_products::Product;
use stockroom_sales::Order;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::live_file::{read_records, write_records};
use crate::records::{
    decode_order, decode_product, decode_write_off, encode_order, encode_product,
    encode_write_off,
};

use super::{OrderStore, ProductStore, WriteOffLedger};

/// Product file. Read and rewritten whole on every call.
#[derive(Debug, Clone)]
pub struct ProductFile {
    path: PathBuf,
}

impl ProductFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductStore for ProductFile {
    fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(read_records(&self.path, decode_product)?.records)
    }

    fn save_products(&mut self, products: &[&Product]) -> Result<(), StoreError> {
        write_records(&self.path, products.iter().copied(), encode_product)?;
        Ok(())
    }
}

/// Order file with its orders cached in memory.
#[derive(Debug)]
pub struct OrderFile {
    path: PathBuf,
    orders: Vec<Order>,
    ids: IdAllocator,
}

impl OrderFile {
    /// Load `path` (missing means empty) and seed the order id allocator.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.into(),
            orders: Vec::new(),
            ids: IdAllocator::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-read the file, replacing the cached orders.
    pub fn reload(&mut self) -> Result<usize, StoreError> {
        self.orders = read_records(&self.path, decode_order)?.records;
        self.ids
            .reset_after(self.orders.iter().map(|o| o.id_typed().get()).max());
        Ok(self.orders.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderStore for OrderFile {
    fn orders(&self) -> &[Order] {
        &self.orders
    }

    fn ids(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    fn commit(&mut self, orders: Vec<Order>) -> Result<(), StoreError> {
        write_records(&self.path, &orders, encode_order)?;
        self.orders = orders;
        Ok(())
    }
}

/// Write-off ledger file with its records cached in memory.
#[derive(Debug)]
pub struct WriteOffFile {
    path: PathBuf,
    records: Vec<WriteOffRecord>,
}

impl WriteOffFile {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut ledger = Self {
            path: path.into(),
            records: Vec::new(),
        };
        ledger.reload()?;
        Ok(ledger)
    }

    pub fn reload(&mut self) -> Result<usize, StoreError> {
        self.records = read_records(&self.path, decode_write_off)?.records;
        Ok(self.records.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WriteOffLedger for WriteOffFile {
    fn records(&self) -> &[WriteOffRecord] {
        &self.records
    }

    fn commit(&mut self, records: Vec<WriteOffRecord>) -> Result<(), StoreError> {
        write_records(&self.path, &records, encode_write_off)?;
        self.records = records;
        Ok(())
    }
}

/// The three file stores for one data directory.
#[derive(Debug)]
pub struct FileStores {
    pub products: ProductFile,
    pub orders: OrderFile,
    pub write_offs: WriteOffFile,
}

impl FileStores {
    /// Create the data directory if needed and open every store in it.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(config.data_dir())
            .map_err(|e| StoreError::io(config.data_dir(), e))?;
        let stores = Self {
            products: ProductFile::new(config.products_path()),
            orders: OrderFile::open(config.orders_path())?,
            write_offs: WriteOffFile::open(config.write_offs_path())?,
        };
        info!(
            data_dir = %config.data_dir().display(),
            orders = stores.orders.orders().len(),
            write_offs = stores.write_offs.records().len(),
            "file stores opened"
        );
        Ok(stores)
    }
}
