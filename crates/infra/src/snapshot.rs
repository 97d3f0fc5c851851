//! Full-inventory snapshot export and import.
//!
//! ```text
//! [magic u32 = "PROD"][version u32 = 1][count u32]
//! [id][name][category][quantity][unit price][kind label] * count
//! ```
//!
//! Unlike the live files, the snapshot always carries a header and a count.

use std::path::Path;

use tracing::{info, warn};

use stockroom_inventory::InventoryService;
use stockroom_products::Product;

use crate::codec::{Reader, Writer};
use crate::error::StoreError;
use crate::records::{decode_product, encode_product};

pub const SNAPSHOT_MAGIC: u32 = 0x5052_4F44;
pub const SNAPSHOT_VERSION: u32 = 1;

pub fn encode_snapshot(products: &[&Product]) -> Result<Vec<u8>, StoreError> {
    let count = u32::try_from(products.len())
        .map_err(|_| StoreError::malformed("too many products for a snapshot"))?;
    let mut w = Writer::new();
    w.put_u32(SNAPSHOT_MAGIC);
    w.put_u32(SNAPSHOT_VERSION);
    w.put_u32(count);
    for product in products {
        encode_product(product, &mut w)?;
    }
    Ok(w.into_bytes())
}

/// Decode a snapshot image. A record that does not decode ends the read and
/// the products before it are returned.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<Product>, StoreError> {
    let mut r = Reader::new(bytes);
    let magic = r.get_u32("snapshot magic")?;
    if magic != SNAPSHOT_MAGIC {
        return Err(StoreError::BadMagic(magic));
    }
    let version = r.get_u32("snapshot version")?;
    if version != SNAPSHOT_VERSION {
        return Err(StoreError::UnsupportedVersion(version));
    }
    let count = r.get_u32("snapshot count")?;

    let mut products = Vec::new();
    for index in 0..count {
        match decode_product(&mut r) {
            Ok(product) => products.push(product),
            Err(err) => {
                warn!(index, expected = count, error = %err, "snapshot truncated at malformed record");
                break;
            }
        }
    }
    Ok(products)
}

pub fn export_snapshot(inventory: &InventoryService, path: &Path) -> Result<usize, StoreError> {
    let products = inventory.get_all_products();
    let bytes = encode_snapshot(&products)?;
    std::fs::write(path, bytes).map_err(|e| StoreError::io(path, e))?;
    info!(path = %path.display(), count = products.len(), "snapshot exported");
    Ok(products.len())
}

/// Add every product in the snapshot at `path` to `inventory`.
///
/// Products whose id is already present are skipped. Returns how many were
/// added.
pub fn import_snapshot(inventory: &mut InventoryService, path: &Path) -> Result<usize, StoreError> {
    let bytes = std::fs::read(path).map_err(|e| StoreError::io(path, e))?;
    let mut added = 0;
    for product in decode_snapshot(&bytes)? {
        let id = product.id_typed();
        match inventory.add_product(product) {
            Ok(()) => added += 1,
            Err(err) => warn!(product_id = %id, error = %err, "snapshot product skipped"),
        }
    }
    info!(path = %path.display(), added, next_id = %inventory.next_product_id(), "snapshot imported");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ProductId;

    fn product(id: i32, name: &str) -> Product {
        Product::new(ProductId::new(id), name, "Tools", id * 2, 1.25).unwrap()
    }

    #[test]
    fn header_layout() {
        let bytes = encode_snapshot(&[&product(1, "Saw")]).unwrap();
        assert_eq!(&bytes[..12], &[0x50, 0x52, 0x4F, 0x44, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn bad_magic_and_version() {
        let err = decode_snapshot(&[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, StoreError::BadMagic(1)));

        let mut w = Writer::new();
        w.put_u32(SNAPSHOT_MAGIC);
        w.put_u32(7);
        w.put_u32(0);
        let err = decode_snapshot(w.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion(7)));
    }

    #[test]
    fn export_then_import_into_fresh_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.snap");

        let mut source = InventoryService::new();
        source.add_product(product(3, "Saw")).unwrap();
        source.add_product(product(8, "Drill")).unwrap();
        assert_eq!(export_snapshot(&source, &path).unwrap(), 2);

        let mut target = InventoryService::new();
        target.add_product(product(3, "Other")).unwrap();
        assert_eq!(import_snapshot(&mut target, &path).unwrap(), 1);
        assert_eq!(target.get_product(ProductId::new(3)).unwrap().name(), "Other");
        assert_eq!(target.get_product(ProductId::new(8)).unwrap().name(), "Drill");
        assert_eq!(target.next_product_id(), ProductId::new(9));
    }

    #[test]
    fn truncated_snapshot_keeps_leading_products() {
        let mut bytes = encode_snapshot(&[&product(1, "Saw"), &product(2, "Drill")]).unwrap();
        bytes.truncate(bytes.len() - 3);
        let products = decode_snapshot(&bytes).unwrap();
        assert_eq!(products.len(), 1);
    }
}
