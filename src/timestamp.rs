//! Date/time normalization for export records.
//!
//! Exports carry the date (`dd.mm.yyyy`) and the time (`HH:MM`) in separate
//! columns and no zone information. The pair is read as wall-clock time of
//! the local zone and converted to whole epoch seconds.

use crate::constants::DATETIME_FORMAT;
use crate::error::TimestampParseError;
use chrono::{Local, LocalResult, NaiveDateTime, TimeDelta, TimeZone};

/// Convert a `Datum`/`Uhrzeit` pair to epoch seconds in the process's local zone
pub fn normalize(date: &str, time: &str) -> Result<i64, TimestampParseError> {
    normalize_in(date, time, &Local)
}

/// Convert a `Datum`/`Uhrzeit` pair to epoch seconds in the given zone
///
/// Wall-clock times repeated by a DST change resolve to the earlier instant.
/// Times skipped by a DST change are read with the offset in force before
/// the change, so 02:30 on a spring-forward night becomes 03:30 summer time.
pub fn normalize_in<Tz: TimeZone>(
    date: &str,
    time: &str,
    zone: &Tz,
) -> Result<i64, TimestampParseError> {
    let naive = parse_naive(date, time)?;
    resolve(zone, &naive).ok_or_else(|| TimestampParseError {
        date: date.to_string(),
        time: time.to_string(),
        reason: "local time cannot be placed in this time zone".to_string(),
    })
}

fn resolve<Tz: TimeZone>(zone: &Tz, naive: &NaiveDateTime) -> Option<i64> {
    match zone.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt.timestamp()),
        LocalResult::Ambiguous(a, b) => Some(a.timestamp().min(b.timestamp())),
        LocalResult::None => {
            // Gap: take the offset one hour earlier and add the hour back
            let gap = TimeDelta::hours(1);
            let before = naive.checked_sub_signed(gap)?;
            match zone.from_local_datetime(&before) {
                LocalResult::Single(dt) => Some(dt.timestamp() + gap.num_seconds()),
                _ => None,
            }
        }
    }
}

/// Parse the pair into a zone-less date/time
pub fn parse_naive(date: &str, time: &str) -> Result<NaiveDateTime, TimestampParseError> {
    let combined = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&combined, DATETIME_FORMAT).map_err(|e| TimestampParseError {
        date: date.to_string(),
        time: time.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc};

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[test]
    fn test_normalize_fixed_zone() {
        assert_eq!(normalize_in("01.01.2023", "08:00", &cet()).unwrap(), 1672556400);
        assert_eq!(normalize_in("01.01.2023", "08:00", &Utc).unwrap(), 1672560000);
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(normalize_in("29.02.2024", "14:05", &Utc).unwrap(), 1709215500);
        assert!(normalize("29.02.2024", "14:05").is_ok());
        assert!(normalize_in("29.02.2023", "14:05", &Utc).is_err());
    }

    #[test]
    fn test_invalid_calendar_day() {
        let err = normalize("31.04.2023", "10:00").unwrap_err();
        assert_eq!(err.date, "31.04.2023");
        assert_eq!(err.time, "10:00");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_malformed_inputs() {
        for (date, time) in [
            ("32.13.2023", "25:99"),
            ("01.01.2023", "25:00"),
            ("01.01.2023", "08:60"),
            ("2023-01-01", "08:00"),
            ("01/01/2023", "08:00"),
            ("xx.01.2023", "08:00"),
            ("01.01.2023", ""),
            ("", "08:00"),
            ("01.01.2023", "08:00:30"),
        ] {
            assert!(
                normalize_in(date, time, &Utc).is_err(),
                "expected failure for '{} {}'",
                date,
                time
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(
            normalize_in(" 01.01.2023 ", " 08:00", &cet()).unwrap(),
            1672556400
        );
    }

    #[test]
    fn test_parse_naive_keeps_wall_clock() {
        let naive = parse_naive("31.12.2023", "23:59").unwrap();
        assert_eq!(naive.hour(), 23);
        assert_eq!(naive.minute(), 59);
        assert_eq!(naive.second(), 0);
    }
}
