//! Assembly error types

use contracts::ContractError;
use thiserror::Error;

/// Per-record assembly failure
///
/// Every variant is contained at the record boundary: the fact yields no
/// message and the batch continues.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A scene fact field is missing or has the wrong shape
    #[error("field '{key}': {message}")]
    Field { key: String, message: String },

    /// A conversion collaborator rejected the input
    #[error("conversion failed: {0}")]
    Conversion(#[source] ContractError),

    /// The finished payload could not be rendered as JSON
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AssemblyError {
    pub fn field(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<ContractError> for AssemblyError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::FieldExtraction { key, message } => Self::Field { key, message },
            other => Self::Conversion(other),
        }
    }
}

/// Assembly Result type alias
pub type Result<T> = std::result::Result<T, AssemblyError>;
