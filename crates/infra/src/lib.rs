//! Infrastructure layer: binary file stores, snapshot export, text reports,
//! configuration, and the services that combine inventory rules with
//! persistence.

pub mod codec;
pub mod config;
pub mod error;
pub mod live_file;
pub mod records;
pub mod report;
pub mod services;
pub mod snapshot;
pub mod store;


pub use config::StoreConfig;
pub use error::{ServiceError, StoreError};
pub use services::{
    AdjustmentResult, AdjustmentRow, InventoryAdjustmentService, OrderOutcome, OrderService,
    WriteOffOutcome, WriteOffService,
};
pub use store::{
    FileStores, InMemoryOrderStore, InMemoryProductStore, InMemoryWriteOffLedger, OrderFile,
    OrderStore, ProductFile, ProductStore, WriteOffFile, WriteOffLedger,
};
