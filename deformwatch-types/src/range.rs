//! Temporal range - the global `[low, high]` selection window.

use chrono::NaiveDateTime;

/// Inclusive date-time window shared by all points of a sensor type.
///
/// A range with `low > high` is valid and selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalRange {
    pub low: NaiveDateTime,
    pub high: NaiveDateTime,
}

impl TemporalRange {
    pub const fn new(low: NaiveDateTime, high: NaiveDateTime) -> Self {
        Self { low, high }
    }

    /// Window covering every representable date-time.
    pub const fn unbounded() -> Self {
        Self {
            low: NaiveDateTime::MIN,
            high: NaiveDateTime::MAX,
        }
    }

    /// `low > high`.
    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }

    /// Inclusive membership test. Always false for inverted ranges.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.low <= t && t <= self.high
    }
}

impl Default for TemporalRange {
    fn default() -> Self {
        Self::unbounded()
    }
}
