//! Quaternion orientation to compass heading
//!
//! Rotations are `[w, x, y, z]` in an ENU frame: yaw is counter-clockwise
//! from east. Compass headings are clockwise from north in `[0, 360)`.
//! The published form is a 16-bit heading-slice mask, one bit per 22.5°
//! sector, rendered as four lowercase hex digits.

use contracts::ContractError;
use nalgebra::{Quaternion, UnitQuaternion};

/// Width of one heading slice in degrees
pub const SECTOR_DEGREES: f64 = 22.5;
/// Number of heading slices
pub const SECTORS: u32 = 16;

const MIN_NORM: f64 = 1e-9;

/// Compass heading in degrees
pub fn compass_heading(rotation: [f64; 4]) -> Result<f64, ContractError> {
    let [w, x, y, z] = rotation;
    if rotation.iter().any(|v| !v.is_finite()) {
        return Err(ContractError::conversion(format!(
            "non-finite quaternion {rotation:?}"
        )));
    }

    let raw = Quaternion::new(w, x, y, z);
    if raw.norm() < MIN_NORM {
        return Err(ContractError::conversion("zero-norm quaternion"));
    }

    let (_, _, yaw) = UnitQuaternion::from_quaternion(raw).euler_angles();
    // rounded to micro-degrees so exact cardinal yaws land in their own sector
    let heading = ((90.0 - yaw.to_degrees()) * 1e6).round() / 1e6;
    let heading = heading.rem_euclid(360.0);
    Ok(if heading >= 360.0 { 0.0 } else { heading })
}

/// Sector index in `0..16` of a compass heading
pub fn sector(heading: f64) -> u32 {
    ((heading / SECTOR_DEGREES).floor() as u32).min(SECTORS - 1)
}

fn render(mask: u16) -> String {
    format!("{mask:04x}")
}

/// Single heading-slice bit
pub fn heading_mask(rotation: [f64; 4]) -> Result<String, ContractError> {
    let s = sector(compass_heading(rotation)?);
    Ok(render(1 << s))
}

/// Heading-slice bit plus both neighbouring slices
pub fn direction_mask(rotation: [f64; 4]) -> Result<String, ContractError> {
    let s = sector(compass_heading(rotation)?);
    let left = (s + SECTORS - 1) % SECTORS;
    let right = (s + 1) % SECTORS;
    Ok(render((1 << s) | (1 << left) | (1 << right)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    const IDENTITY: [f64; 4] = [1.0, 0.0, 0.0, 0.0];
    /// 90° yaw: facing north
    const NORTH: [f64; 4] = [FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2];

    #[test]
    fn test_identity_faces_east() {
        assert!((compass_heading(IDENTITY).unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(heading_mask(IDENTITY).unwrap(), "0010");
        assert_eq!(direction_mask(IDENTITY).unwrap(), "0038");
    }

    #[test]
    fn test_north_wraps_neighbours() {
        assert_eq!(compass_heading(NORTH).unwrap(), 0.0);
        assert_eq!(heading_mask(NORTH).unwrap(), "0001");
        assert_eq!(direction_mask(NORTH).unwrap(), "8003");
    }

    #[test]
    fn test_unnormalized_quaternion_is_accepted() {
        let scaled = [2.0, 0.0, 0.0, 0.0];
        assert_eq!(heading_mask(scaled).unwrap(), "0010");
    }

    #[test]
    fn test_degenerate_quaternions() {
        let err = heading_mask([0.0; 4]).unwrap_err();
        assert!(err.to_string().contains("zero-norm"), "got: {err}");
        assert!(matches!(err, ContractError::Conversion { .. }), "got: {err}");
        assert!(direction_mask([f64::NAN, 0.0, 0.0, 1.0]).is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_heading_in_range(
                w in -1.0..1.0_f64,
                x in -1.0..1.0_f64,
                y in -1.0..1.0_f64,
                z in -1.0..1.0_f64,
            ) {
                prop_assume!((w * w + x * x + y * y + z * z).sqrt() > 1e-3);
                let heading = compass_heading([w, x, y, z])?;
                prop_assert!((0.0..360.0).contains(&heading), "heading {}", heading);

                let mask = u16::from_str_radix(&heading_mask([w, x, y, z])?, 16)?;
                prop_assert_eq!(mask.count_ones(), 1);
                let cone = u16::from_str_radix(&direction_mask([w, x, y, z])?, 16)?;
                prop_assert_eq!(cone.count_ones(), 3);
                prop_assert!(cone & mask == mask);
            }
        }
    }
}
