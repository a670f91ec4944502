//! Parsing and formatting of calendar periods ("30d", "12h", "2w").

use chrono::Duration;

use crate::error::{Error, Result};

/// Suffix to seconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("min", 60.0),
    ("w", 604_800.0),
    ("d", 86_400.0),
    ("h", 3_600.0),
    ("s", 1.0),
];

/// Parse period strings like "30d", "1.5h", "2w", "90min", "45s"
pub fn parse_period(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str
                .trim()
                .parse()
                .map_err(|_| Error::InvalidDuration(s.to_string()))?;
            if !val.is_finite() || val < 0.0 {
                return Err(Error::InvalidDuration(s.to_string()));
            }
            return Duration::try_seconds((val * multiplier).round() as i64)
                .ok_or_else(|| Error::InvalidDuration(s.to_string()));
        }
    }

    Err(Error::InvalidDuration(s.to_string()))
}

/// Format a period for display, using the largest unit that divides it evenly
pub fn format_period(d: Duration) -> String {
    let secs = d.num_seconds();
    if secs == 0 {
        "0s".to_string()
    } else if secs % 604_800 == 0 {
        format!("{}w", secs / 604_800)
    } else if secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else if secs % 60 == 0 {
        format!("{}min", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
