//! Compact JSON codec

use contracts::{ContractError, WireCodec};
use serde_json::Value;

const NAME: &str = "json";

/// Canonical compact JSON; decode re-parses and re-renders.
#[derive(Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

fn canonical(text: &str) -> Result<String, ContractError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ContractError::codec(NAME, format!("invalid JSON: {e}")))?;
    serde_json::to_string(&value).map_err(|e| ContractError::codec(NAME, e.to_string()))
}

impl WireCodec for JsonCodec {
    fn name(&self) -> &str {
        NAME
    }

    fn encode(&mut self, json: &str) -> Result<String, ContractError> {
        canonical(json)
    }

    fn decode(&mut self, wire: &str) -> Result<String, ContractError> {
        canonical(wire)
    }
}
