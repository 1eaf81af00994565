//! Message payloads - Message Assembler output
//!
//! Typed ALERT (RoadSideAlert) and ADVISORY (TravelerInformation) documents.
//! Field declaration order is the serialized key order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rolling message sequence number in `[0, 127]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MsgCount(u8);

impl MsgCount {
    /// First value of a run
    pub const ZERO: Self = Self(0);
    /// Largest value before wraparound
    pub const MAX: u8 = 127;

    /// Create a counter value, `None` when above [`MsgCount::MAX`]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Current value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Value after this one, wrapping 127 → 0
    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % (Self::MAX + 1))
    }
}

impl TryFrom<u8> for MsgCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("msgCnt {value} out of range 0..=127"))
    }
}

impl From<MsgCount> for u8 {
    fn from(count: MsgCount) -> Self {
        count.0
    }
}

impl fmt::Display for MsgCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two published message families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFamily {
    /// Road hazard alert (RoadSideAlert)
    #[default]
    Alert,
    /// Traveler information advisory (TravelerInformation)
    Advisory,
}

impl MessageFamily {
    /// J2735 message identifier used in the codec envelope
    pub const fn message_id(self) -> u16 {
        match self {
            Self::Alert => 27,
            Self::Advisory => 31,
        }
    }

    /// Lowercase name for logs and metric labels
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Advisory => "advisory",
        }
    }
}

impl fmt::Display for MessageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UTC calendar time (`second` holds milliseconds within the minute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// Geodetic position in fixed-point units (1e-7 degree, 0.1 m)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geodetic {
    pub lat: i64,
    pub lon: i64,
    pub elevation: i64,
}

// ===== ALERT =====

/// ALERT document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMessage {
    pub msg_cnt: MsgCount,
    pub time_stamp: u32,
    pub type_event: u32,
    pub description: Vec<u16>,
    pub priority: String,
    pub heading: String,
    pub position: AlertPosition,
    pub regional: Vec<AlertRegional>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPosition {
    pub utc_time: DDateTime,
    pub long: i64,
    pub lat: i64,
    pub elevation: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRegional {
    pub region_id: u8,
    pub reg_ext_value: AlertRegExtValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRegExtValue {
    pub cits: AlertCits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCits {
    #[serde(rename = "stopID")]
    pub stop_id: String,
    pub text: String,
    #[serde(rename = "sendUniqueId")]
    pub send_unique_id: String,
}

// ===== ADVISORY =====

/// ADVISORY document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryMessage {
    pub msg_cnt: MsgCount,
    pub time_stamp: u32,
    pub data_frames: Vec<AdvisoryDataFrame>,
    pub regional: Vec<AdvisoryRegional>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryDataFrame {
    pub ssp_tim_rights: u8,
    pub frame_type: String,
    pub msg_id: MsgId,
    pub start_year: i32,
    pub start_time: i64,
    pub regions: Vec<AdvisoryRegion>,
    pub ssp_msg_rights1: u8,
    pub ssp_msg_rights2: u8,
    pub content: AdvisoryContent,
    /// Key spelling matches the receiving systems
    #[serde(rename = "duratonTime")]
    pub duraton_time: u16,
    pub priority: u8,
    pub ssp_location_rights: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgId {
    #[serde(rename = "furtherInfoID")]
    pub further_info_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRegion {
    pub anchor: Anchor,
    pub direction: String,
    pub description: RegionDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub lat: i64,
    pub long: i64,
    pub elevation: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDescription {
    pub path: RegionPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPath {
    pub offset: PathOffset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOffset {
    pub ll: NodeListLL,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeListLL {
    pub nodes: Vec<PathNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub delta: NodeDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDelta {
    #[serde(rename = "node-LatLon")]
    pub node_lat_lon: NodeLatLon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLatLon {
    pub lon: i64,
    pub lat: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryContent {
    pub advisory: Vec<AdvisoryItemWrapper>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryItemWrapper {
    pub item: AdvisoryItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryItem {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRegional {
    pub region_id: u8,
    pub reg_ext_value: AdvisoryRegExtValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRegExtValue {
    pub cits: Vec<AdvisoryCits>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryCits {
    pub text: Vec<String>,
    pub subtext: Vec<String>,
    #[serde(rename = "stopID")]
    pub stop_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_count_wraps() {
        let last = MsgCount::new(127).unwrap();
        assert_eq!(last.next(), MsgCount::ZERO);
        assert_eq!(MsgCount::ZERO.next().value(), 1);
        assert!(MsgCount::new(128).is_none());
    }

    #[test]
    fn test_msg_count_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<MsgCount>("128").is_err());
        assert_eq!(serde_json::from_str::<MsgCount>("5").unwrap().value(), 5);
    }

    #[test]
    fn test_family_message_ids() {
        assert_eq!(MessageFamily::Alert.message_id(), 27);
        assert_eq!(MessageFamily::Advisory.message_id(), 31);
        assert_eq!(MessageFamily::Advisory.to_string(), "advisory");
    }

    #[test]
    fn test_alert_key_order() {
        let msg = AlertMessage {
            msg_cnt: MsgCount::ZERO,
            time_stamp: 10,
            type_event: 0,
            description: vec![],
            priority: "01".into(),
            heading: "0".into(),
            position: AlertPosition {
                utc_time: DDateTime {
                    year: 2018,
                    month: 7,
                    day: 24,
                    hour: 3,
                    minute: 28,
                    second: 47647,
                },
                long: 1,
                lat: 2,
                elevation: 3,
            },
            regional: vec![AlertRegional {
                region_id: 4,
                reg_ext_value: AlertRegExtValue {
                    cits: AlertCits {
                        stop_id: "loc".into(),
                        text: "fd".into(),
                        send_unique_id: "CAM".into(),
                    },
                },
            }],
        };

        let json = serde_json::to_string(&msg).unwrap();
        let order = [
            "\"msgCnt\"",
            "\"timeStamp\"",
            "\"typeEvent\"",
            "\"description\"",
            "\"priority\"",
            "\"heading\"",
            "\"position\"",
            "\"utcTime\"",
            "\"long\"",
            "\"lat\"",
            "\"elevation\"",
            "\"regional\"",
            "\"regionId\"",
            "\"regExtValue\"",
            "\"stopID\"",
            "\"sendUniqueId\"",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|key| json.find(key).unwrap_or_else(|| panic!("{key} missing in {json}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "order: {json}");
    }
}
