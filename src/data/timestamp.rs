//! Lenient timestamp parsing for import documents and CLI arguments.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Accepted date-time layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a local date-time. A bare date is read as midnight.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    for format in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidTimestamp(s.to_string()))
}

/// Parse the upper end of a window. A bare date covers the whole day.
pub fn parse_window_end(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| Error::InvalidTimestamp(s.to_string()));
    }
    parse_timestamp(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, sec).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_timestamp("2024-05-01T12:30:00").unwrap(), at(2024, 5, 1, 12, 30, 0));
    }

    #[test]
    fn test_parse_space_separated_with_fraction() {
        let t = parse_timestamp("2024-05-01 12:30:00.250").unwrap();
        assert_eq!(t.format("%H:%M:%S%.3f").to_string(), "12:30:00.250");
    }

    #[test]
    fn test_parse_bare_date() {
        assert_eq!(parse_timestamp("2024-05-01").unwrap(), at(2024, 5, 1, 0, 0, 0));
        let end = parse_window_end("2024-05-01").unwrap();
        assert!(end > at(2024, 5, 1, 23, 59, 59));
        assert!(end < at(2024, 5, 2, 0, 0, 0));
    }

    #[test]
    fn test_window_end_covers_fractional_last_second() {
        let end = parse_window_end("2024-05-01").unwrap();
        assert!(parse_timestamp("2024-05-01 23:59:59.500").unwrap() <= end);
        assert!(parse_timestamp("2024-05-01T23:59:59.999999999").unwrap() <= end);
        assert!(parse_timestamp("2024-05-02").unwrap() > end);
        // explicit times are taken as given
        assert_eq!(parse_window_end("2024-05-01 12:00").unwrap(), at(2024, 5, 1, 12, 0, 0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-13-01").is_err());
    }
}
