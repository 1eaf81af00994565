//! WireCodec trait - external binary protocol codec
//!
//! The dispatcher hands each message to a codec for an encode-then-decode
//! round trip. Both directions may fail; callers must treat failures as
//! per-message diagnostics.

use crate::ContractError;

/// Text-in, text-out wire codec.
pub trait WireCodec: Send {
    /// Codec name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Encode a JSON document into its wire representation
    ///
    /// # Errors
    /// Returns a codec error when the input cannot be encoded
    fn encode(&mut self, json: &str) -> Result<String, ContractError>;

    /// Decode a wire representation back into JSON text
    ///
    /// # Errors
    /// Returns a codec error when the input is not valid wire data
    fn decode(&mut self, wire: &str) -> Result<String, ContractError>;
}

impl<C: WireCodec + ?Sized> WireCodec for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&mut self, json: &str) -> Result<String, ContractError> {
        (**self).encode(json)
    }

    fn decode(&mut self, wire: &str) -> Result<String, ContractError> {
        (**self).decode(wire)
    }
}
