//! Scene entities - Entity Store contents
//!
//! Eight normalized, uuid-keyed record types describing a recorded driving
//! scene. Field names follow the snake_case layout of the source JSON files.
//! Shapes that the source does not guarantee (vector lengths, optional
//! attributes) are kept loose here and checked when a scene fact is built.

use serde::{Deserialize, Deserializer, Serialize};

use crate::EntityId;

/// Dataset (scene) metadata, points at the log it was cut from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub uuid: EntityId,
    pub log_uuid: EntityId,
    #[serde(default)]
    pub scenario_names: Vec<String>,
}

/// Ego vehicle pose at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgoPose {
    pub uuid: EntityId,
    /// Epoch microseconds, kept as decimal text (sources emit numbers or strings)
    #[serde(deserialize_with = "number_or_string")]
    pub timestamp: String,
    /// UTM easting, northing, elevation (meters)
    #[serde(default)]
    pub translation: serde_json::Value,
    /// Orientation quaternion `[w, x, y, z]`
    #[serde(default)]
    pub rotation: serde_json::Value,
}

/// One keyframe of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub uuid: EntityId,
    pub dataset_uuid: EntityId,
}

/// One sensor reading of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    pub uuid: EntityId,
    pub frame_uuid: EntityId,
    pub ego_pose_uuid: EntityId,
    pub sensor_uuid: EntityId,
}

/// Object annotation attached to one sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnnotation {
    pub uuid: EntityId,
    pub frame_data_uuid: EntityId,
    pub instance_uuid: EntityId,
    /// Free-form attribute object, expected to carry `vehicle_state`
    #[serde(default)]
    pub attribute: Option<serde_json::Value>,
    /// Integer level or null
    #[serde(default)]
    pub visibility_level: serde_json::Value,
}

/// Tracked object instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub uuid: EntityId,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// Recording log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub uuid: EntityId,
    pub location: String,
}

/// Sensor mounted on the ego vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub uuid: EntityId,
    pub name: String,
    /// Mounting orientation quaternion `[w, x, y, z]`
    #[serde(default)]
    pub rotation: serde_json::Value,
}

/// Common access to the identifier of every entity type.
pub trait Entity: Send + Sync {
    fn uuid(&self) -> &EntityId;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                #[inline]
                fn uuid(&self) -> &EntityId {
                    &self.uuid
                }
            }
        )*
    };
}

impl_entity!(Dataset, EgoPose, Frame, FrameData, FrameAnnotation, Instance, Log, Sensor);

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ego_pose_numeric_timestamp() {
        let pose: EgoPose = serde_json::from_str(
            r#"{"uuid":"e1","timestamp":1532402927647951,
                "translation":[1.0,2.0,3.0],"rotation":[1.0,0.0,0.0,0.0]}"#,
        )
        .unwrap();
        assert_eq!(pose.timestamp, "1532402927647951");
        assert_eq!(pose.uuid, "e1");
    }

    #[test]
    fn test_ego_pose_string_timestamp() {
        let pose: EgoPose = serde_json::from_str(
            r#"{"uuid":"e1","timestamp":"1532402927647951.0",
                "translation":[],"rotation":[]}"#,
        )
        .unwrap();
        assert_eq!(pose.timestamp, "1532402927647951.0");
    }

    #[test]
    fn test_optional_fields_default() {
        let ann: FrameAnnotation = serde_json::from_str(
            r#"{"uuid":"a1","frame_data_uuid":"fd1","instance_uuid":"i1"}"#,
        )
        .unwrap();
        assert!(ann.attribute.is_none());
        assert!(ann.visibility_level.is_null());

        let sensor: Sensor = serde_json::from_str(r#"{"uuid":"s1","name":"CAM_FRONT"}"#).unwrap();
        assert!(sensor.rotation.is_null());
    }

    #[test]
    fn test_malformed_shapes_still_load() {
        let pose: EgoPose = serde_json::from_str(
            r#"{"uuid":"e1","timestamp":1,"translation":[326865.278,null,49.126],"rotation":"?"}"#,
        )
        .unwrap();
        assert!(pose.translation[1].is_null());
        assert_eq!(pose.rotation, "?");

        let ann: FrameAnnotation = serde_json::from_str(
            r#"{"uuid":"a1","frame_data_uuid":"fd1","instance_uuid":"i1",
                "visibility_level":"high"}"#,
        )
        .unwrap();
        assert_eq!(ann.visibility_level, "high");
    }
}
