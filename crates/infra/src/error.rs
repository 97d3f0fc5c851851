//! Persistence and service error model.

use std::path::PathBuf;

use thiserror::Error;

use stockroom_core::DomainError;

/// Store operation error.
///
/// These are **infrastructure errors** (file access, undecodable bytes) as
/// opposed to domain errors (validation, invariants). A missing file is not
/// an error; it reads as an empty store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be decoded. Loads stop at the first malformed
    /// record and keep what came before it, so this never escapes a load.
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("not a snapshot file (bad magic 0x{0:08X})")]
    BadMagic(u32),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Error returned by the services that combine inventory rules with a store.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            ServiceError::Store(StoreError::Domain(e)) => Some(e),
            ServiceError::Store(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.domain().is_some_and(DomainError::is_not_found)
    }
}
