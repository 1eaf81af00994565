//! ALERT (RoadSideAlert) assembly

use contracts::{
    keys, AlertCits, AlertMessage, AlertPosition, AlertRegExtValue, AlertRegional, MsgCount,
    SceneFact,
};

use crate::error::Result;
use crate::extract::{self, AssemblyContext};
use crate::itis::derive_codes;

pub const TYPE_EVENT: u32 = 0;
pub const PRIORITY: &str = "01";
pub const REGION_ID: u8 = 4;
/// Heading used when the sensor carries no rotation
pub const DEFAULT_HEADING: &str = "0";

/// Build one ALERT payload from a scene fact
pub fn assemble_alert(
    fact: &SceneFact,
    ctx: &AssemblyContext<'_>,
    msg_cnt: MsgCount,
) -> Result<AlertMessage> {
    let micros = extract::timestamp_micros(fact)?;
    let time_stamp = ctx.converter.minute_of_year(micros)?;
    let utc_time = ctx.converter.utc_time(micros)?;
    let geo = extract::position(fact, ctx)?;

    let heading = match extract::sensor_rotation(fact)? {
        Some(rotation) => ctx
            .converter
            .quaternion_to_heading(rotation)
            .map_err(extract::rotation_field(keys::SENSOR_ROTATION))?,
        None => DEFAULT_HEADING.to_string(),
    };

    let description = derive_codes(extract::category_name(fact)?, extract::vehicle_state(fact)?)
        .into_iter()
        .map(u16::from)
        .collect();

    Ok(AlertMessage {
        msg_cnt,
        time_stamp,
        type_event: TYPE_EVENT,
        description,
        priority: PRIORITY.to_string(),
        heading,
        position: AlertPosition {
            utc_time,
            long: geo.lon,
            lat: geo.lat,
            elevation: geo.elevation,
        },
        regional: vec![AlertRegional {
            region_id: REGION_ID,
            reg_ext_value: AlertRegExtValue {
                cits: AlertCits {
                    stop_id: fact.require_str(keys::LOG_LOCATION)?.to_string(),
                    text: fact.require_str(keys::FRAME_DATA_UUID)?.to_string(),
                    send_unique_id: fact.require_str(keys::SENSOR_NAME)?.to_string(),
                },
            },
        }],
    })
}
