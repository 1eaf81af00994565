//! StandardConverter - default conversion collaborator

use contracts::{ContractError, DDateTime, DecomposedTimestamp, GeoTimeConverter, Geodetic};

use crate::{orientation, time, utm};

/// WGS-84 / chrono backed converter used by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardConverter;

impl StandardConverter {
    pub fn new() -> Self {
        Self
    }
}

impl GeoTimeConverter for StandardConverter {
    fn minute_of_year(&self, epoch_micros: i64) -> Result<u32, ContractError> {
        time::minute_of_year(epoch_micros)
    }

    fn decompose_timestamp(&self, epoch_micros: i64) -> Result<DecomposedTimestamp, ContractError> {
        time::decompose(epoch_micros)
    }

    fn utc_time(&self, epoch_micros: i64) -> Result<DDateTime, ContractError> {
        time::utc_time(epoch_micros)
    }

    fn utm_to_geodetic(
        &self,
        easting: f64,
        northing: f64,
        zone: u8,
        elevation: f64,
    ) -> Result<Geodetic, ContractError> {
        utm::to_geodetic(easting, northing, zone, elevation)
    }

    fn quaternion_to_heading(&self, rotation: [f64; 4]) -> Result<String, ContractError> {
        orientation::heading_mask(rotation)
    }

    fn quaternion_to_direction(&self, rotation: [f64; 4]) -> Result<String, ContractError> {
        orientation::direction_mask(rotation)
    }
}
