//! Observation counts per calendar month, for histogram displays.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Observation counts keyed by `"YYYY-MM"`.
///
/// Keys sort chronologically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonthlyCounts(BTreeMap<String, usize>);

impl MonthlyCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every timestamp yielded by `timestamps`.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        let mut counts = Self::new();
        for t in timestamps {
            counts.record(t);
        }
        counts
    }

    pub fn record(&mut self, t: NaiveDateTime) {
        *self.0.entry(month_key(t)).or_default() += 1;
    }

    /// Add another set of counts into this one.
    pub fn merge(&mut self, other: &MonthlyCounts) {
        for (month, count) in &other.0 {
            *self.0.entry(month.clone()).or_default() += count;
        }
    }

    pub fn get(&self, month: &str) -> usize {
        self.0.get(month).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

fn month_key(t: NaiveDateTime) -> String {
    t.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn test_counts_by_month() {
        let counts = MonthlyCounts::from_timestamps([
            at(2024, 1, 3),
            at(2024, 1, 28),
            at(2024, 2, 1),
            at(2023, 12, 31),
        ]);
        assert_eq!(counts.get("2024-01"), 2);
        assert_eq!(counts.get("2024-02"), 1);
        assert_eq!(counts.get("2024-03"), 0);
        assert_eq!(counts.total(), 4);

        let months: Vec<&str> = counts.iter().map(|(m, _)| m).collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_merge() {
        let mut a = MonthlyCounts::from_timestamps([at(2024, 1, 1)]);
        let b = MonthlyCounts::from_timestamps([at(2024, 1, 2), at(2024, 5, 2)]);
        a.merge(&b);
        assert_eq!(a.get("2024-01"), 2);
        assert_eq!(a.get("2024-05"), 1);
    }
}
