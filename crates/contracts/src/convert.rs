//! GeoTimeConverter trait - coordinate and time conversions
//!
//! Shared by both message assemblers so the two families cannot drift apart.

use crate::{ContractError, DDateTime, Geodetic};

/// Timestamp split into its UTC year and the microseconds elapsed since
/// the start of that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedTimestamp {
    pub year: i32,
    pub offset_micros: i64,
}

/// Geodetic and temporal conversion collaborator.
///
/// All timestamps are epoch microseconds.
pub trait GeoTimeConverter: Send + Sync {
    /// Whole minutes since 00:00 UTC on January 1st of the instant's year,
    /// always in `[0, 527040)`
    fn minute_of_year(&self, epoch_micros: i64) -> Result<u32, ContractError>;

    /// UTC year plus intra-year offset
    fn decompose_timestamp(&self, epoch_micros: i64) -> Result<DecomposedTimestamp, ContractError>;

    /// UTC calendar breakdown
    fn utc_time(&self, epoch_micros: i64) -> Result<DDateTime, ContractError>;

    /// UTM (meters, northern hemisphere) to fixed-point geodetic coordinates
    fn utm_to_geodetic(
        &self,
        easting: f64,
        northing: f64,
        zone: u8,
        elevation: f64,
    ) -> Result<Geodetic, ContractError>;

    /// Quaternion `[w, x, y, z]` to a heading string
    fn quaternion_to_heading(&self, rotation: [f64; 4]) -> Result<String, ContractError>;

    /// Quaternion `[w, x, y, z]` to a formatted direction string
    fn quaternion_to_direction(&self, rotation: [f64; 4]) -> Result<String, ContractError>;
}
