//! Entity store error types

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

/// Entity store errors
///
/// Every variant means the store could not be populated.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Data directory missing or not a directory
    #[error("data directory not found: {}", path.display())]
    DirectoryNotFound {
        /// Directory path
        path: PathBuf,
    },

    /// Entity file could not be read
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Entity file content does not match the entity shape
    #[error("failed to parse {}: {source}", path.display())]
    ParseFailed {
        /// File path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl From<StoreError> for ContractError {
    fn from(err: StoreError) -> Self {
        ContractError::StoreBootstrap {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Entity store Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
