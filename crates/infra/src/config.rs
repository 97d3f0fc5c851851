//! Store locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_PRODUCTS_FILE: &str = "products.dat";
pub const DEFAULT_ORDERS_FILE: &str = "orders.dat";
pub const DEFAULT_WRITE_OFFS_FILE: &str = "writeoff.dat";

/// Where the three live files live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub products_file: String,
    pub orders_file: String,
    pub write_offs_file: String,
}

impl StoreConfig {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            products_file: DEFAULT_PRODUCTS_FILE.to_string(),
            orders_file: DEFAULT_ORDERS_FILE.to_string(),
            write_offs_file: DEFAULT_WRITE_OFFS_FILE.to_string(),
        }
    }

    /// Build from `STOCKROOM_*` environment variables.
    ///
    /// `STOCKROOM_DATA_DIR` defaults to the working directory; the file name
    /// variables default to [`DEFAULT_PRODUCTS_FILE`] and friends.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("STOCKROOM_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                warn!("STOCKROOM_DATA_DIR not set; storing data in the working directory");
                PathBuf::from(".")
            });

        let file = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            data_dir,
            products_file: file("STOCKROOM_PRODUCTS_FILE", DEFAULT_PRODUCTS_FILE),
            orders_file: file("STOCKROOM_ORDERS_FILE", DEFAULT_ORDERS_FILE),
            write_offs_file: file("STOCKROOM_WRITE_OFFS_FILE", DEFAULT_WRITE_OFFS_FILE),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(&self.products_file)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.orders_file)
    }

    pub fn write_offs_path(&self) -> PathBuf {
        self.data_dir.join(&self.write_offs_file)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}
