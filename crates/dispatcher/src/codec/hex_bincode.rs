//! bincode codec
//!
//! The envelope is split into its message id and the compact JSON text of
//! its value, serialized with bincode and rendered as lowercase hex.

use contracts::{ContractError, WireCodec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAME: &str = "bincode";

#[derive(Debug, Serialize, Deserialize)]
struct WireEnvelope {
    message_id: u16,
    value: String,
}

/// bincode envelope as hex text
#[derive(Debug, Default)]
pub struct BincodeCodec {
    /// Bytes produced by the last encode
    last_frame_len: usize,
}

impl BincodeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size in bytes of the last encoded frame
    pub fn last_frame_len(&self) -> usize {
        self.last_frame_len
    }
}

fn codec_err(message: impl Into<String>) -> ContractError {
    ContractError::codec(NAME, message)
}

impl WireCodec for BincodeCodec {
    fn name(&self) -> &str {
        NAME
    }

    fn encode(&mut self, json: &str) -> Result<String, ContractError> {
        let envelope: Value =
            serde_json::from_str(json).map_err(|e| codec_err(format!("invalid JSON: {e}")))?;

        let message_id = envelope
            .get("messageId")
            .and_then(Value::as_u64)
            .and_then(|id| u16::try_from(id).ok())
            .ok_or_else(|| codec_err("envelope lacks a numeric messageId"))?;
        let value = envelope
            .get("value")
            .ok_or_else(|| codec_err("envelope lacks a value"))?;

        let frame = WireEnvelope {
            message_id,
            value: serde_json::to_string(value).map_err(|e| codec_err(e.to_string()))?,
        };
        let bytes =
            bincode::serialize(&frame).map_err(|e| codec_err(format!("bincode error: {e}")))?;
        self.last_frame_len = bytes.len();
        Ok(hex::encode(&bytes))
    }

    fn decode(&mut self, wire: &str) -> Result<String, ContractError> {
        let bytes = hex::decode(wire).map_err(|e| codec_err(format!("invalid hex: {e}")))?;
        let frame: WireEnvelope =
            bincode::deserialize(&bytes).map_err(|e| codec_err(format!("bincode error: {e}")))?;
        let value: Value = serde_json::from_str(&frame.value)
            .map_err(|e| codec_err(format!("invalid JSON payload: {e}")))?;

        let envelope = serde_json::json!({
            "messageId": frame.message_id,
            "value": value,
        });
        serde_json::to_string(&envelope).map_err(|e| codec_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &str = r#"{"messageId":27,"value":{"msgCnt":3,"heading":"0010"}}"#;

    #[test]
    fn test_round_trip_preserves_envelope() {
        let mut codec = BincodeCodec::new();
        let wire = codec.encode(ENVELOPE).unwrap();
        assert!(wire.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(wire.len(), codec.last_frame_len() * 2);

        let decoded: Value = serde_json::from_str(&codec.decode(&wire).unwrap()).unwrap();
        let original: Value = serde_json::from_str(ENVELOPE).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        let mut codec = BincodeCodec::new();
        for wire in ["abc", "zz"] {
            let err = codec.decode(wire).unwrap_err();
            assert!(err.to_string().contains("invalid hex"), "got: {err}");
        }
    }

    #[test]
    fn test_decode_accepts_uppercase_hex() {
        let mut codec = BincodeCodec::new();
        let wire = codec.encode(ENVELOPE).unwrap().to_uppercase();
        let decoded: Value = serde_json::from_str(&codec.decode(&wire).unwrap()).unwrap();
        assert_eq!(decoded["value"]["heading"], "0010");
    }

    #[test]
    fn test_encode_requires_message_id() {
        let err = BincodeCodec::new().encode(r#"{"value":{}}"#).unwrap_err();
        assert!(err.to_string().contains("messageId"), "got: {err}");
    }

    #[test]
    fn test_decode_truncated_frame() {
        let mut codec = BincodeCodec::new();
        let wire = codec.encode(ENVELOPE).unwrap();
        let err = codec.decode(&wire[..10]).unwrap_err();
        assert!(matches!(err, ContractError::Codec { .. }), "got: {err}");
    }
}
