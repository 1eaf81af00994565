//! Configuration validation
//!
//! Rules:
//! - source.data_dir is not empty
//! - publisher.interval_ms > 0
//! - publisher.utm_zone in 1..=60

use contracts::{ContractError, PublisherBlueprint};

/// Valid UTM zone numbers
const UTM_ZONES: std::ops::RangeInclusive<u8> = 1..=60;

/// Validate a PublisherBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &PublisherBlueprint) -> Result<(), ContractError> {
    validate_source(blueprint)?;
    validate_publisher(blueprint)?;
    Ok(())
}

fn validate_source(blueprint: &PublisherBlueprint) -> Result<(), ContractError> {
    if blueprint.source.data_dir.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "source.data_dir",
            "data_dir cannot be empty",
        ));
    }
    Ok(())
}

fn validate_publisher(blueprint: &PublisherBlueprint) -> Result<(), ContractError> {
    let publisher = &blueprint.publisher;

    if publisher.interval_ms == 0 {
        return Err(ContractError::config_validation(
            "publisher.interval_ms",
            "interval_ms must be > 0",
        ));
    }

    if !UTM_ZONES.contains(&publisher.utm_zone) {
        return Err(ContractError::config_validation(
            "publisher.utm_zone",
            format!("utm_zone must be within 1..=60, got {}", publisher.utm_zone),
        ));
    }

    Ok(())
}

/// Non-fatal observations about a valid configuration
pub fn collect_warnings(blueprint: &PublisherBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.publisher.interval_ms < 100 {
        warnings.push(format!(
            "publisher.interval_ms = {} is below 100ms; receivers usually expect ~1s cadence",
            blueprint.publisher.interval_ms
        ));
    }

    if !blueprint.source.data_dir.exists() {
        warnings.push(format!(
            "source.data_dir '{}' does not exist yet",
            blueprint.source.data_dir.display()
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        CodecConfig, ConfigVersion, JoinConfig, PublisherConfig, SourceConfig,
    };
    use std::path::PathBuf;

    fn minimal_blueprint() -> PublisherBlueprint {
        PublisherBlueprint {
            version: ConfigVersion::V1,
            source: SourceConfig {
                data_dir: PathBuf::from("./data"),
            },
            join: JoinConfig::default(),
            publisher: PublisherConfig::default(),
            codec: CodecConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_blueprint()).is_ok());
    }

    #[test]
    fn test_empty_data_dir() {
        let mut bp = minimal_blueprint();
        bp.source.data_dir = PathBuf::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_zero_interval() {
        let mut bp = minimal_blueprint();
        bp.publisher.interval_ms = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("interval_ms must be > 0"), "got: {err}");
    }

    #[test]
    fn test_invalid_utm_zone() {
        let mut bp = minimal_blueprint();
        bp.publisher.utm_zone = 61;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("publisher.utm_zone"), "got: {err}");

        bp.publisher.utm_zone = 0;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_fast_interval_warns() {
        let mut bp = minimal_blueprint();
        bp.publisher.interval_ms = 10;
        let warnings = collect_warnings(&bp);
        assert!(warnings.iter().any(|w| w.contains("below 100ms")));
    }
}
