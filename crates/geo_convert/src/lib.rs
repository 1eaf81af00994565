//! # Geo Convert
//!
//! Default [`GeoTimeConverter`](contracts::GeoTimeConverter) implementation.
//!
//! - [`time`]: epoch-microsecond timestamps to minute-of-year, year/offset and UTC calendar time
//! - [`utm`]: WGS-84 transverse Mercator, both directions
//! - [`orientation`]: quaternion to compass heading and heading-slice bit strings

pub mod orientation;
pub mod time;
pub mod utm;

mod converter;

pub use converter::StandardConverter;
pub use time::parse_timestamp_micros;
pub use utm::{geodetic_to_utm, utm_to_lat_lon};
