//! WGS-84 Universal Transverse Mercator, northern hemisphere
//!
//! Series expansions after Snyder, *Map Projections: A Working Manual*
//! (USGS 1395), eq. 8-9 to 8-25. Sub-millimetre within a zone.

use contracts::{ContractError, Geodetic};

const SEMI_MAJOR: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const SCALE: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;

/// Fixed-point scale of latitude/longitude (1e-7 degree)
pub const DEGREE_SCALE: f64 = 1e7;
/// Fixed-point scale of elevation (0.1 m)
pub const ELEVATION_SCALE: f64 = 10.0;

const E2: f64 = FLATTENING * (2.0 - FLATTENING);
const EP2: f64 = E2 / (1.0 - E2);

fn check_zone(zone: u8) -> Result<(), ContractError> {
    if (1..=60).contains(&zone) {
        Ok(())
    } else {
        Err(ContractError::conversion(format!("UTM zone {zone} outside 1..=60")))
    }
}

/// Central meridian of a zone, radians
fn central_meridian(zone: u8) -> f64 {
    (f64::from(zone) * 6.0 - 183.0).to_radians()
}

/// Meridional arc length from the equator
fn meridian_arc(lat: f64) -> f64 {
    let e4 = E2 * E2;
    let e6 = e4 * E2;
    SEMI_MAJOR
        * ((1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * E2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

/// Inverse projection to floating-point degrees `(lat, lon)`
pub fn utm_to_lat_lon(easting: f64, northing: f64, zone: u8) -> Result<(f64, f64), ContractError> {
    check_zone(zone)?;
    if !easting.is_finite() || !northing.is_finite() {
        return Err(ContractError::conversion(format!(
            "non-finite UTM coordinate ({easting}, {northing})"
        )));
    }

    let x = easting - FALSE_EASTING;
    let e4 = E2 * E2;
    let e6 = e4 * E2;

    // footpoint latitude
    let meridian = SEMI_MAJOR * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0);
    let mu = northing / SCALE / meridian;
    let e1 = (1.0 - (1.0 - E2).sqrt()) / (1.0 + (1.0 - E2).sqrt());
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin1, cos1) = phi1.sin_cos();
    let tan1 = phi1.tan();
    let n1 = SEMI_MAJOR / (1.0 - E2 * sin1 * sin1).sqrt();
    let t1 = tan1 * tan1;
    let c1 = EP2 * cos1 * cos1;
    let r1 = SEMI_MAJOR * (1.0 - E2) / (1.0 - E2 * sin1 * sin1).powf(1.5);
    let d = x / (n1 * SCALE);

    let lat = phi1
        - (n1 * tan1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * EP2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * EP2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * EP2 + 24.0 * t1 * t1) * d.powi(5)
                / 120.0)
            / cos1;

    Ok((lat.to_degrees(), lon.to_degrees()))
}

/// Forward projection of degrees to `(easting, northing)` in meters
pub fn geodetic_to_utm(lat_deg: f64, lon_deg: f64, zone: u8) -> Result<(f64, f64), ContractError> {
    check_zone(zone)?;
    if !(0.0..=84.0).contains(&lat_deg) || !lon_deg.is_finite() {
        return Err(ContractError::conversion(format!(
            "({lat_deg}, {lon_deg}) outside northern UTM coverage"
        )));
    }

    let lat = lat_deg.to_radians();
    let (sin, cos) = lat.sin_cos();
    let tan = lat.tan();
    let n = SEMI_MAJOR / (1.0 - E2 * sin * sin).sqrt();
    let t = tan * tan;
    let c = EP2 * cos * cos;
    let a = cos * (lon_deg.to_radians() - central_meridian(zone));

    let easting = SCALE
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * EP2) * a.powi(5) / 120.0)
        + FALSE_EASTING;
    let northing = SCALE
        * (meridian_arc(lat)
            + n * tan
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * EP2) * a.powi(6) / 720.0));

    Ok((easting, northing))
}

/// Inverse projection rounded to fixed-point output units
pub fn to_geodetic(
    easting: f64,
    northing: f64,
    zone: u8,
    elevation: f64,
) -> Result<Geodetic, ContractError> {
    if !elevation.is_finite() {
        return Err(ContractError::conversion(format!("non-finite elevation {elevation}")));
    }
    let (lat, lon) = utm_to_lat_lon(easting, northing, zone)?;
    Ok(Geodetic {
        lat: (lat * DEGREE_SCALE).round() as i64,
        lon: (lon * DEGREE_SCALE).round() as i64,
        elevation: (elevation * ELEVATION_SCALE).round() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sample() {
        let g = to_geodetic(326_865.278, 4_147_694.510, 52, 49.126).unwrap();
        assert!((g.lat - 374_599_238).abs() <= 1, "lat: {}", g.lat);
        assert!((g.lon - 1_270_423_884).abs() <= 1, "lon: {}", g.lon);
        assert_eq!(g.elevation, 491);
    }

    #[test]
    fn test_central_meridian_on_false_easting() {
        let (_, lon) = utm_to_lat_lon(FALSE_EASTING, 4_000_000.0, 52).unwrap();
        assert!((lon - 129.0).abs() < 1e-9, "lon: {lon}");
    }

    #[test]
    fn test_invalid_zone() {
        let err = utm_to_lat_lon(326_865.0, 4_147_694.0, 0).unwrap_err();
        assert!(err.to_string().contains("zone 0"), "got: {err}");
        assert!(geodetic_to_utm(37.0, 127.0, 61).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(to_geodetic(f64::NAN, 4_147_694.0, 52, 0.0).is_err());
        assert!(to_geodetic(326_865.0, 4_147_694.0, 52, f64::INFINITY).is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_roundtrip_within_zone(
                lat in 0.0..80.0_f64,
                zone in 1u8..=60,
                offset in -3.0..3.0_f64,
            ) {
                let lon = f64::from(zone) * 6.0 - 183.0 + offset;
                let (x, y) = geodetic_to_utm(lat, lon, zone)?;
                let (lat2, lon2) = utm_to_lat_lon(x, y, zone)?;
                prop_assert!((lat2 - lat).abs() < 1e-7, "lat {} -> {}", lat, lat2);
                prop_assert!((lon2 - lon).abs() < 1e-7, "lon {} -> {}", lon, lon2);
            }
        }
    }
}
