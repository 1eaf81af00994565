//! Scene fact field extraction shared by both message families

use contracts::{json_type, keys, ContractError, GeoTimeConverter, Geodetic, SceneFact};
use serde_json::Value;

use crate::error::{AssemblyError, Result};

/// Collaborators and constants of one assembly run
#[derive(Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub converter: &'a dyn GeoTimeConverter,
    /// UTM zone of `egoPose_translation`
    pub utm_zone: u8,
}

impl<'a> AssemblyContext<'a> {
    pub fn new(converter: &'a dyn GeoTimeConverter, utm_zone: u8) -> Self {
        Self {
            converter,
            utm_zone,
        }
    }
}

/// `egoPose_timestamp` as whole epoch microseconds
pub fn timestamp_micros(fact: &SceneFact) -> Result<i64> {
    let text = fact.require_str(keys::EGO_POSE_TIMESTAMP)?;
    Ok(geo_convert::parse_timestamp_micros(text)?)
}

/// `egoPose_translation` converted to fixed-point geodetic coordinates
pub fn position(fact: &SceneFact, ctx: &AssemblyContext<'_>) -> Result<Geodetic> {
    let [easting, northing, elevation] = fact.require_f64_array::<3>(keys::EGO_POSE_TRANSLATION)?;
    Ok(ctx
        .converter
        .utm_to_geodetic(easting, northing, ctx.utm_zone, elevation)?)
}

/// `frameAnnotation_attribute.vehicle_state`
///
/// A null or absent attribute yields `None`. An attribute that is present
/// but not an object, or that lacks a string `vehicle_state`, is malformed.
pub fn vehicle_state(fact: &SceneFact) -> Result<Option<&str>> {
    let key = keys::FRAME_ANNOTATION_ATTRIBUTE;
    match fact.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(attribute)) => match attribute.get("vehicle_state") {
            Some(Value::String(state)) => Ok(Some(state.as_str())),
            Some(other) => Err(AssemblyError::field(
                key,
                format!("vehicle_state must be a string, got {}", json_type(other)),
            )),
            None => Err(AssemblyError::field(key, "vehicle_state missing")),
        },
        Some(other) => Err(AssemblyError::field(
            key,
            format!("expected object, got {}", json_type(other)),
        )),
    }
}

/// `instance_categoryName`, null treated as absent
pub fn category_name(fact: &SceneFact) -> Result<Option<&str>> {
    let key = keys::INSTANCE_CATEGORY_NAME;
    match fact.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) => Ok(Some(name.as_str())),
        Some(other) => Err(AssemblyError::field(
            key,
            format!("expected string, got {}", json_type(other)),
        )),
    }
}

/// `sensor_rotation` when it is a list, `None` otherwise
pub fn sensor_rotation(fact: &SceneFact) -> Result<Option<[f64; 4]>> {
    match fact.get(keys::SENSOR_ROTATION) {
        Some(Value::Array(_)) => Ok(Some(fact.require_f64_array::<4>(keys::SENSOR_ROTATION)?)),
        _ => Ok(None),
    }
}

/// Attribute a rejected quaternion to the fact field it came from
pub fn rotation_field(key: &'static str) -> impl FnOnce(ContractError) -> AssemblyError {
    move |err| AssemblyError::field(key, err.to_string())
}

/// Plain-text rendering used in free-text advisories
///
/// Strings bare, lists as `[a, b]`, null as `null`, objects as `{k=v}`.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render_text).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}={}", render_text(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

/// Text rendering of a fact field, `null` when the key is absent
pub fn render_field(fact: &SceneFact, key: &str) -> String {
    fact.get(key).map_or_else(|| "null".to_string(), render_text)
}
