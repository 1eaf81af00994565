//! SceneFact - Join Engine output
//!
//! One flattened record per resolved (FrameData, FrameAnnotation) pair.
//! Keys are `"<entity>_<field>"`; the key set is fixed by the entity schemas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ContractError;

/// Well-known scene fact keys read by the message assemblers.
pub mod keys {
    pub const DATASET_SCENARIO_NAMES: &str = "dataset_scenarioNames";
    pub const EGO_POSE_TIMESTAMP: &str = "egoPose_timestamp";
    pub const EGO_POSE_TRANSLATION: &str = "egoPose_translation";
    pub const EGO_POSE_ROTATION: &str = "egoPose_rotation";
    pub const SENSOR_NAME: &str = "sensor_name";
    pub const SENSOR_ROTATION: &str = "sensor_rotation";
    pub const FRAME_DATA_UUID: &str = "frameData_uuid";
    pub const FRAME_ANNOTATION_UUID: &str = "frameAnnotation_uuid";
    pub const FRAME_ANNOTATION_ATTRIBUTE: &str = "frameAnnotation_attribute";
    pub const FRAME_ANNOTATION_VISIBILITY_LEVEL: &str = "frameAnnotation_visibilityLevel";
    pub const INSTANCE_CATEGORY_NAME: &str = "instance_categoryName";
    pub const LOG_LOCATION: &str = "log_location";
}

/// Flat, namespaced view over the eight entities of one annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneFact {
    fields: Map<String, Value>,
}

impl SceneFact {
    /// Create an empty fact
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a namespaced field, returning the previous value if the key collided
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Raw field lookup (`None` when the key is not part of the fact)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field that must be present; JSON `null` is returned as-is
    pub fn require(&self, key: &str) -> Result<&Value, ContractError> {
        self.fields
            .get(key)
            .ok_or_else(|| ContractError::field_extraction(key, "missing from scene fact"))
    }

    /// Field that must be a string
    pub fn require_str(&self, key: &str) -> Result<&str, ContractError> {
        match self.require(key)? {
            Value::String(s) => Ok(s),
            other => Err(ContractError::field_extraction(
                key,
                format!("expected string, got {}", json_type(other)),
            )),
        }
    }

    /// Field that must be an array of exactly `N` numbers
    pub fn require_f64_array<const N: usize>(&self, key: &str) -> Result<[f64; N], ContractError> {
        let items = match self.require(key)? {
            Value::Array(items) => items,
            other => {
                return Err(ContractError::field_extraction(
                    key,
                    format!("expected array, got {}", json_type(other)),
                ))
            }
        };
        if items.len() != N {
            return Err(ContractError::field_extraction(
                key,
                format!("expected {N} elements, got {}", items.len()),
            ));
        }

        let mut out = [0.0; N];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item.as_f64().ok_or_else(|| {
                ContractError::field_extraction(key, format!("non-numeric element {item}"))
            })?;
        }
        Ok(out)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the fact has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over field keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Short JSON type name for diagnostics
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
