//! Scene fact fixtures for unit tests

use contracts::{keys, SceneFact};
use geo_convert::StandardConverter;
use serde_json::json;

pub(crate) static CONVERTER: StandardConverter = StandardConverter;

/// Fully populated fact: truck, moving, identity rotations
pub(crate) fn sample_fact() -> SceneFact {
    let mut fact = SceneFact::new();
    fact.insert("dataset_uuid", json!("ds1"));
    fact.insert("dataset_logUuid", json!("log1"));
    fact.insert(keys::DATASET_SCENARIO_NAMES, json!(["merge", "night"]));
    fact.insert("egoPose_uuid", json!("ep1"));
    fact.insert(keys::EGO_POSE_TIMESTAMP, json!("1532402927647951"));
    fact.insert(keys::EGO_POSE_TRANSLATION, json!([326865.278, 4147694.510, 49.126]));
    fact.insert(keys::EGO_POSE_ROTATION, json!([1.0, 0.0, 0.0, 0.0]));
    fact.insert("sensor_uuid", json!("s1"));
    fact.insert(keys::SENSOR_NAME, json!("CAM_FRONT"));
    fact.insert(keys::SENSOR_ROTATION, json!([1.0, 0.0, 0.0, 0.0]));
    fact.insert("frame_uuid", json!("f1"));
    fact.insert("frame_datasetUuid", json!("ds1"));
    fact.insert(keys::FRAME_DATA_UUID, json!("fd1"));
    fact.insert("frameData_frameUuid", json!("f1"));
    fact.insert("frameData_egoPoseUuid", json!("ep1"));
    fact.insert("frameData_sensorUuid", json!("s1"));
    fact.insert(keys::FRAME_ANNOTATION_UUID, json!("a1"));
    fact.insert("frameAnnotation_frameDataUuid", json!("fd1"));
    fact.insert("frameAnnotation_instanceUuid", json!("i1"));
    fact.insert(keys::FRAME_ANNOTATION_ATTRIBUTE, json!({"vehicle_state": "moving"}));
    fact.insert(keys::FRAME_ANNOTATION_VISIBILITY_LEVEL, json!(3));
    fact.insert("instance_uuid", json!("i1"));
    fact.insert(keys::INSTANCE_CATEGORY_NAME, json!("dynamic_object.vehicle.truck"));
    fact.insert("log_uuid", json!("log1"));
    fact.insert(keys::LOG_LOCATION, json!("seoul-gangnam"));
    fact
}
