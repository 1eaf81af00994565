//! Schema-declared flattening
//!
//! Each entity type lists its published fields once. A scene fact key is
//! `"<prefix>_<name>"`, so the key set of every fact is fixed by these
//! tables and never by runtime presence.

use contracts::{
    ContractError, Dataset, EgoPose, Frame, FrameAnnotation, FrameData, Instance, Log, SceneFact,
    Sensor,
};
use serde_json::Value;

/// One published field of an entity
pub struct FieldSpec<E> {
    pub name: &'static str,
    pub accessor: fn(&E) -> Result<Value, ContractError>,
}

/// Entity types that can be merged into a [`SceneFact`]
pub trait FlattenSchema: Sized + 'static {
    /// Namespace prefix of every key contributed by this entity
    const PREFIX: &'static str;

    fn fields() -> &'static [FieldSpec<Self>];
}

/// Namespaced key for one field
pub fn fact_key(prefix: &str, name: &str) -> String {
    format!("{prefix}_{name}")
}

/// Merge every declared field of `entity` into `fact`
pub fn flatten_into<E: FlattenSchema>(
    entity: &E,
    fact: &mut SceneFact,
) -> Result<(), ContractError> {
    for field in E::fields() {
        let value = (field.accessor)(entity)?;
        fact.insert(fact_key(E::PREFIX, field.name), value);
    }
    Ok(())
}

fn keys_of<E: FlattenSchema>(out: &mut Vec<String>) {
    out.extend(E::fields().iter().map(|field| fact_key(E::PREFIX, field.name)));
}

/// Every key of a scene fact, in merge order
pub fn fact_keys() -> Vec<String> {
    let mut keys = Vec::new();
    keys_of::<Dataset>(&mut keys);
    keys_of::<EgoPose>(&mut keys);
    keys_of::<Sensor>(&mut keys);
    keys_of::<Frame>(&mut keys);
    keys_of::<FrameData>(&mut keys);
    keys_of::<FrameAnnotation>(&mut keys);
    keys_of::<Instance>(&mut keys);
    keys_of::<Log>(&mut keys);
    keys
}

fn id(value: &contracts::EntityId) -> Value {
    Value::from(value.as_str())
}

/// A JSON array of exactly `expected` numbers, re-emitted as floats
fn numbers(
    prefix: &str,
    name: &str,
    value: &Value,
    expected: usize,
) -> Result<Value, ContractError> {
    let key = fact_key(prefix, name);
    let invalid = |message: String| ContractError::field_extraction(key.clone(), message);

    let items = value
        .as_array()
        .ok_or_else(|| invalid(format!("expected an array of numbers, got {value}")))?;
    if items.len() != expected {
        return Err(invalid(format!("expected {expected} elements, got {}", items.len())));
    }
    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64()
                .ok_or_else(|| invalid(format!("element {i} is not a number: {item}")))
        })
        .collect::<Result<Vec<f64>, _>>()?;
    Ok(Value::from(values))
}

/// Integer level or null, anything else is a malformed annotation
fn level(value: &Value) -> Result<Value, ContractError> {
    if value.is_null() || value.is_i64() || value.is_u64() {
        return Ok(value.clone());
    }
    Err(ContractError::field_extraction(
        fact_key(FrameAnnotation::PREFIX, "visibilityLevel"),
        format!("expected an integer or null, got {value}"),
    ))
}

impl FlattenSchema for Dataset {
    const PREFIX: &'static str = "dataset";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<Dataset>; 3] = [
            FieldSpec {
                name: "uuid",
                accessor: |d| Ok(id(&d.uuid)),
            },
            FieldSpec {
                name: "logUuid",
                accessor: |d| Ok(id(&d.log_uuid)),
            },
            FieldSpec {
                name: "scenarioNames",
                accessor: |d| Ok(Value::from(d.scenario_names.clone())),
            },
        ];
        &FIELDS
    }
}

impl FlattenSchema for EgoPose {
    const PREFIX: &'static str = "egoPose";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<EgoPose>; 4] = [
            FieldSpec {
                name: "uuid",
                accessor: |e| Ok(id(&e.uuid)),
            },
            FieldSpec {
                name: "timestamp",
                accessor: |e| Ok(Value::from(e.timestamp.clone())),
            },
            FieldSpec {
                name: "translation",
                accessor: |e| numbers(EgoPose::PREFIX, "translation", &e.translation, 3),
            },
            FieldSpec {
                name: "rotation",
                accessor: |e| numbers(EgoPose::PREFIX, "rotation", &e.rotation, 4),
            },
        ];
        &FIELDS
    }
}

impl FlattenSchema for Sensor {
    const PREFIX: &'static str = "sensor";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<Sensor>; 3] = [
            FieldSpec {
                name: "uuid",
                accessor: |s| Ok(id(&s.uuid)),
            },
            FieldSpec {
                name: "name",
                accessor: |s| Ok(Value::from(s.name.clone())),
            },
            FieldSpec {
                name: "rotation",
                accessor: |s| match &s.rotation {
                    Value::Array(_) => numbers(Sensor::PREFIX, "rotation", &s.rotation, 4),
                    other => Ok(other.clone()),
                },
            },
        ];
        &FIELDS
    }
}

impl FlattenSchema for Frame {
    const PREFIX: &'static str = "frame";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<Frame>; 2] = [
            FieldSpec {
                name: "uuid",
                accessor: |f| Ok(id(&f.uuid)),
            },
            FieldSpec {
                name: "datasetUuid",
                accessor: |f| Ok(id(&f.dataset_uuid)),
            },
        ];
        &FIELDS
    }
}

impl FlattenSchema for FrameData {
    const PREFIX: &'static str = "frameData";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<FrameData>; 4] = [
            FieldSpec {
                name: "uuid",
                accessor: |fd| Ok(id(&fd.uuid)),
            },
            FieldSpec {
                name: "frameUuid",
                accessor: |fd| Ok(id(&fd.frame_uuid)),
            },
            FieldSpec {
                name: "egoPoseUuid",
                accessor: |fd| Ok(id(&fd.ego_pose_uuid)),
            },
            FieldSpec {
                name: "sensorUuid",
                accessor: |fd| Ok(id(&fd.sensor_uuid)),
            },
        ];
        &FIELDS
    }
}

impl FlattenSchema for FrameAnnotation {
    const PREFIX: &'static str = "frameAnnotation";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<FrameAnnotation>; 5] = [
            FieldSpec {
                name: "uuid",
                accessor: |a| Ok(id(&a.uuid)),
            },
            FieldSpec {
                name: "frameDataUuid",
                accessor: |a| Ok(id(&a.frame_data_uuid)),
            },
            FieldSpec {
                name: "instanceUuid",
                accessor: |a| Ok(id(&a.instance_uuid)),
            },
            FieldSpec {
                name: "attribute",
                accessor: |a| Ok(a.attribute.clone().unwrap_or(Value::Null)),
            },
            FieldSpec {
                name: "visibilityLevel",
                accessor: |a| level(&a.visibility_level),
            },
        ];
        &FIELDS
    }
}

impl FlattenSchema for Instance {
    const PREFIX: &'static str = "instance";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<Instance>; 2] = [
            FieldSpec {
                name: "uuid",
                accessor: |i| Ok(id(&i.uuid)),
            },
            FieldSpec {
                name: "categoryName",
                accessor: |i| Ok(i.category_name.clone().map_or(Value::Null, Value::from)),
            },
        ];
        &FIELDS
    }
}

impl FlattenSchema for Log {
    const PREFIX: &'static str = "log";

    fn fields() -> &'static [FieldSpec<Self>] {
        static FIELDS: [FieldSpec<Log>; 2] = [
            FieldSpec {
                name: "uuid",
                accessor: |l| Ok(id(&l.uuid)),
            },
            FieldSpec {
                name: "location",
                accessor: |l| Ok(Value::from(l.location.clone())),
            },
        ];
        &FIELDS
    }
}
