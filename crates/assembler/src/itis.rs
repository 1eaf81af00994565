//! Advisory (ITIS) code derivation
//!
//! Two independent lookups, object category first, then vehicle motion
//! state. Unknown inputs and the `"0"` placeholder contribute nothing.

use std::fmt;

use serde::Serialize;

/// ITIS phrase codes published in ALERT `description`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
#[repr(u16)]
pub enum ItisCode {
    StopAndGoTraffic = 258,
    StoppedVehicle = 532,
    HazardousMaterialVehicle = 545,
    RoadClosureLaneBlockage = 770,
    MobileConstruction = 1041,
    PedestrianOnRoad = 1542,
}

impl ItisCode {
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Code for an instance category name
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "dynamic_object.vehicle.truck" => Some(Self::HazardousMaterialVehicle),
            "dynamic_object.human.pedestrian" => Some(Self::PedestrianOnRoad),
            "movable_object.barrier" => Some(Self::RoadClosureLaneBlockage),
            "movable_object.traffic_cone" => Some(Self::MobileConstruction),
            _ => None,
        }
    }

    /// Code for an annotation `vehicle_state`
    pub fn from_vehicle_state(state: &str) -> Option<Self> {
        match state {
            "moving" => Some(Self::StopAndGoTraffic),
            "stopped" => Some(Self::StoppedVehicle),
            _ => None,
        }
    }
}

impl From<ItisCode> for u16 {
    fn from(code: ItisCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ItisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Zero, one or two codes, category code first
pub fn derive_codes(category: Option<&str>, vehicle_state: Option<&str>) -> Vec<ItisCode> {
    let category = category.filter(|c| *c != "0").and_then(ItisCode::from_category);
    let state = vehicle_state
        .filter(|s| *s != "0")
        .and_then(ItisCode::from_vehicle_state);
    category.into_iter().chain(state).collect()
}
