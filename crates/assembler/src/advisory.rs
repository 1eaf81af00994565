//! ADVISORY (TravelerInformation) assembly
//!
//! The region path is two nodes at the anchor coordinate; no richer path
//! source exists in the scene data.

use contracts::{
    keys, AdvisoryCits, AdvisoryContent, AdvisoryDataFrame, AdvisoryItem, AdvisoryItemWrapper,
    AdvisoryMessage, AdvisoryRegExtValue, AdvisoryRegion, AdvisoryRegional, Anchor, MsgCount,
    MsgId, NodeDelta, NodeLatLon, NodeListLL, PathNode, PathOffset, RegionDescription,
    RegionPath, SceneFact,
};

use crate::error::{AssemblyError, Result};
use crate::extract::{self, render_field, AssemblyContext};

pub const FRAME_TYPE: &str = "advisory";
pub const FURTHER_INFO_ID: &str = "0000";
pub const PRIORITY: u8 = 2;
pub const REGION_ID: u8 = 4;
/// Nodes in the placeholder path
pub const PATH_NODES: usize = 2;

/// Build one ADVISORY payload from a scene fact
pub fn assemble_advisory(
    fact: &SceneFact,
    ctx: &AssemblyContext<'_>,
    msg_cnt: MsgCount,
) -> Result<AdvisoryMessage> {
    let micros = extract::timestamp_micros(fact)?;
    let parts = ctx.converter.decompose_timestamp(micros)?;
    // year and offset are recombined as year * 10^6 + offset before the minute conversion
    let combined = i64::from(parts.year)
        .checked_mul(1_000_000)
        .and_then(|v| v.checked_add(parts.offset_micros))
        .ok_or_else(|| {
            AssemblyError::field(keys::EGO_POSE_TIMESTAMP, "timestamp recombination overflow")
        })?;
    let time_stamp = ctx.converter.minute_of_year(combined)?;

    let geo = extract::position(fact, ctx)?;
    let rotation = fact.require_f64_array::<4>(keys::EGO_POSE_ROTATION)?;
    let direction = ctx
        .converter
        .quaternion_to_direction(rotation)
        .map_err(extract::rotation_field(keys::EGO_POSE_ROTATION))?;

    let text = advisory_text(fact)?;

    let node = PathNode {
        delta: NodeDelta {
            node_lat_lon: NodeLatLon {
                lon: geo.lon,
                lat: geo.lat,
            },
        },
    };

    let data_frame = AdvisoryDataFrame {
        ssp_tim_rights: 0,
        frame_type: FRAME_TYPE.to_string(),
        msg_id: MsgId {
            further_info_id: FURTHER_INFO_ID.to_string(),
        },
        start_year: parts.year,
        start_time: parts.offset_micros,
        regions: vec![AdvisoryRegion {
            anchor: Anchor {
                lat: geo.lat,
                long: geo.lon,
                elevation: geo.elevation,
            },
            direction,
            description: RegionDescription {
                path: RegionPath {
                    offset: PathOffset {
                        ll: NodeListLL {
                            nodes: vec![node; PATH_NODES],
                        },
                    },
                },
            },
        }],
        ssp_msg_rights1: 0,
        ssp_msg_rights2: 0,
        content: AdvisoryContent {
            advisory: vec![AdvisoryItemWrapper {
                item: AdvisoryItem { text },
            }],
        },
        duraton_time: 0,
        priority: PRIORITY,
        ssp_location_rights: 0,
    };

    Ok(AdvisoryMessage {
        msg_cnt,
        time_stamp,
        data_frames: vec![data_frame],
        regional: vec![AdvisoryRegional {
            region_id: REGION_ID,
            reg_ext_value: AdvisoryRegExtValue {
                cits: vec![AdvisoryCits {
                    text: vec![fact.require_str(keys::SENSOR_NAME)?.to_string()],
                    subtext: vec![fact.require_str(keys::FRAME_DATA_UUID)?.to_string()],
                    stop_id: fact.require_str(keys::LOG_LOCATION)?.to_string(),
                }],
            },
        }],
    })
}

/// `category,vehicle_state,scenarioNames,visibilityLevel`
fn advisory_text(fact: &SceneFact) -> Result<String> {
    let state = extract::vehicle_state(fact)?.unwrap_or("null");
    Ok(format!(
        "{},{},{},{}",
        render_field(fact, keys::INSTANCE_CATEGORY_NAME),
        state,
        render_field(fact, keys::DATASET_SCENARIO_NAMES),
        render_field(fact, keys::FRAME_ANNOTATION_VISIBILITY_LEVEL),
    ))
}
