//! Timestamp conversions
//!
//! Source timestamps are epoch microseconds in UTC.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};
use contracts::{keys, ContractError, DDateTime, DecomposedTimestamp};

/// Minutes in a leap year; every minute-of-year value is below this
pub const MINUTES_PER_LEAP_YEAR: u32 = 527_040;

/// Parse decimal timestamp text into whole epoch microseconds (`floor`)
pub fn parse_timestamp_micros(text: &str) -> Result<i64, ContractError> {
    let trimmed = text.trim();
    let value: f64 = trimmed.parse().map_err(|_| {
        ContractError::field_extraction(
            keys::EGO_POSE_TIMESTAMP,
            format!("not a number: {trimmed:?}"),
        )
    })?;

    let floored = value.floor();
    if !floored.is_finite() || floored < i64::MIN as f64 || floored >= i64::MAX as f64 {
        return Err(ContractError::field_extraction(
            keys::EGO_POSE_TIMESTAMP,
            format!("out of range: {trimmed}"),
        ));
    }
    Ok(floored as i64)
}

fn instant(epoch_micros: i64) -> Result<DateTime<Utc>, ContractError> {
    DateTime::<Utc>::from_timestamp_micros(epoch_micros).ok_or_else(|| {
        ContractError::conversion(format!("timestamp {epoch_micros} outside calendar range"))
    })
}

fn start_of_year(year: i32) -> Result<DateTime<Utc>, ContractError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ContractError::conversion(format!("year {year} outside calendar range")))
}

fn elapsed_in_year(epoch_micros: i64) -> Result<(i32, TimeDelta), ContractError> {
    let at = instant(epoch_micros)?;
    let year = at.year();
    Ok((year, at - start_of_year(year)?))
}

/// Whole minutes since 00:00 UTC on January 1st
pub fn minute_of_year(epoch_micros: i64) -> Result<u32, ContractError> {
    let (_, elapsed) = elapsed_in_year(epoch_micros)?;
    u32::try_from(elapsed.num_minutes()).map_err(|_| {
        ContractError::conversion(format!("minute of year out of range for {epoch_micros}"))
    })
}

/// UTC year plus microseconds elapsed since its start
pub fn decompose(epoch_micros: i64) -> Result<DecomposedTimestamp, ContractError> {
    let (year, elapsed) = elapsed_in_year(epoch_micros)?;
    let offset_micros = elapsed
        .num_microseconds()
        .ok_or_else(|| ContractError::conversion("intra-year offset overflow"))?;
    Ok(DecomposedTimestamp {
        year,
        offset_micros,
    })
}

/// Calendar breakdown, `second` carrying milliseconds within the minute
pub fn utc_time(epoch_micros: i64) -> Result<DDateTime, ContractError> {
    let at = instant(epoch_micros)?;
    Ok(DDateTime {
        year: at.year(),
        month: at.month(),
        day: at.day(),
        hour: at.hour(),
        minute: at.minute(),
        second: at.second() * 1000 + at.timestamp_subsec_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2018-07-24T03:28:47.647951Z
    const SAMPLE: i64 = 1_532_402_927_647_951;

    #[test]
    fn test_parse_timestamp_floors() {
        assert_eq!(parse_timestamp_micros("1532402927647951").unwrap(), SAMPLE);
        assert_eq!(parse_timestamp_micros("1532402927647951.9").unwrap(), SAMPLE);
        assert_eq!(parse_timestamp_micros(" 12.5 ").unwrap(), 12);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        for bad in ["", "abc", "NaN", "inf"] {
            let err = parse_timestamp_micros(bad).unwrap_err();
            assert!(
                matches!(err, ContractError::FieldExtraction { .. }),
                "{bad:?} got: {err}"
            );
        }
    }

    #[test]
    fn test_minute_of_year_sample() {
        // 204 full days * 1440 + 3h28m
        assert_eq!(minute_of_year(SAMPLE).unwrap(), 293_968);
    }

    #[test]
    fn test_minute_of_year_bounds() {
        assert_eq!(minute_of_year(0).unwrap(), 0);
        // 2016-12-31T23:59:59Z, leap year
        let last = 1_483_228_799_000_000;
        assert_eq!(minute_of_year(last).unwrap(), MINUTES_PER_LEAP_YEAR - 1);
    }

    #[test]
    fn test_decompose_sample() {
        let parts = decompose(SAMPLE).unwrap();
        assert_eq!(parts.year, 2018);
        assert_eq!(parts.offset_micros, 17_638_127_647_951);
    }

    #[test]
    fn test_utc_time_sample() {
        let t = utc_time(SAMPLE).unwrap();
        assert_eq!((t.year, t.month, t.day), (2018, 7, 24));
        assert_eq!((t.hour, t.minute), (3, 28));
        assert_eq!(t.second, 47_647);
    }

    #[test]
    fn test_pre_epoch_timestamp() {
        // 1969-12-31T23:59:00Z
        let parts = decompose(-60_000_000).unwrap();
        assert_eq!(parts.year, 1969);
        assert_eq!(minute_of_year(-60_000_000).unwrap(), 525_599);
    }
}
