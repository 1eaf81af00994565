//! Layered error definitions
//!
//! Categorized by source: config / store / field / conversion / codec

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Entity Store Errors =====
    /// The entity store could not be populated; aborts the run before dispatch
    #[error("entity store bootstrap failed: {message}")]
    StoreBootstrap {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Record Errors =====
    /// A present field has the wrong shape or type
    #[error("field extraction failed for '{key}': {message}")]
    FieldExtraction { key: String, message: String },

    /// A conversion collaborator rejected its input
    #[error("conversion error: {message}")]
    Conversion { message: String },

    // ===== Codec Errors =====
    /// Wire codec encode/decode failure
    #[error("codec '{codec}' error: {message}")]
    Codec { codec: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create store bootstrap error
    pub fn store_bootstrap(message: impl Into<String>) -> Self {
        Self::StoreBootstrap {
            message: message.into(),
            source: None,
        }
    }

    /// Create field extraction error
    pub fn field_extraction(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldExtraction {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// Create codec error
    pub fn codec(codec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Codec {
            codec: codec.into(),
            message: message.into(),
        }
    }

    /// Whether this error is contained at the record boundary
    pub fn is_per_record(&self) -> bool {
        matches!(
            self,
            Self::FieldExtraction { .. } | Self::Conversion { .. } | Self::Codec { .. }
        )
    }
}
