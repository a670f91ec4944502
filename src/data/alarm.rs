//! Alarm level and consumption computation.
//!
//! A delta is compared against the two nested bands of a threshold:
//! inside `range0` is nominal, inside `range1` is a warning, beyond is an
//! alarm. The percentage tells how much of the outer band is used up.

use std::fmt;

use deformwatch_types::{AlarmThreshold, ThresholdBands};
use serde::{Serialize, Serializer};

use super::baseline::Delta;

/// Discrete severity of a point.
///
/// Ordered so that `max()` picks the worst known level; `Unknown` sorts
/// below everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AlarmLevel {
    #[default]
    Unknown,
    Nominal,
    Warning,
    Alarm,
}

impl AlarmLevel {
    /// Numeric code: -1 unknown, 0 nominal, 1 warning, 2 alarm.
    pub fn code(&self) -> i8 {
        match self {
            AlarmLevel::Unknown => -1,
            AlarmLevel::Nominal => 0,
            AlarmLevel::Warning => 1,
            AlarmLevel::Alarm => 2,
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            AlarmLevel::Unknown => "??",
            AlarmLevel::Nominal => "OK",
            AlarmLevel::Warning => "WARN",
            AlarmLevel::Alarm => "ALARM",
        }
    }
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for AlarmLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

/// Level and consumption for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AlarmOutcome {
    pub level: AlarmLevel,
    /// Share of the outer band used, 0–100. Absent when it cannot be computed.
    pub percent: Option<f64>,
}

impl AlarmOutcome {
    pub const UNKNOWN: AlarmOutcome = AlarmOutcome {
        level: AlarmLevel::Unknown,
        percent: None,
    };

    /// Worst level and largest percent of both outcomes.
    pub fn combine(self, other: AlarmOutcome) -> AlarmOutcome {
        let percent = match (self.percent, other.percent) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        AlarmOutcome {
            level: self.level.max(other.level),
            percent,
        }
    }
}

/// Classify a single component value.
///
/// `range0` is always checked before `range1`, so a value just outside a
/// narrow inner band still resolves to a warning when the outer band holds it.
pub fn classify(value: f64, bands: &ThresholdBands) -> AlarmLevel {
    if !value.is_finite() {
        AlarmLevel::Unknown
    } else if bands.range0.contains(value) {
        AlarmLevel::Nominal
    } else if bands.range1.contains(value) {
        AlarmLevel::Warning
    } else {
        AlarmLevel::Alarm
    }
}

/// `min(100, 100 * |value| / max(|range1.min|, |range1.max|))`.
///
/// Absent when the outer bound is zero or not finite.
pub fn consumption(value: f64, bands: &ThresholdBands) -> Option<f64> {
    let bound = bands.range1.magnitude();
    if bound == 0.0 || !bound.is_finite() || !value.is_finite() {
        return None;
    }
    Some((100.0 * value.abs() / bound).min(100.0))
}

/// Evaluate one component value against its bands.
pub fn evaluate_value(value: f64, bands: &ThresholdBands) -> AlarmOutcome {
    AlarmOutcome {
        level: classify(value, bands),
        percent: consumption(value, bands),
    }
}

/// Evaluate a delta against a threshold.
///
/// Every component defined by both the threshold and the delta is checked;
/// the worst level and the largest percent win. Unknown when either side is
/// absent or they share no component.
pub fn evaluate<R>(delta: Option<&Delta<R>>, threshold: Option<&AlarmThreshold>) -> AlarmOutcome {
    let (Some(delta), Some(threshold)) = (delta, threshold) else {
        return AlarmOutcome::UNKNOWN;
    };

    threshold
        .components
        .iter()
        .filter_map(|(key, bands)| delta.get(key).map(|v| evaluate_value(v, bands)))
        .reduce(AlarmOutcome::combine)
        .unwrap_or(AlarmOutcome::UNKNOWN)
}
