//! Temporal filtering of observation histories.
//!
//! Histories are sorted, so the in-window observations of a point are always
//! one contiguous slice found by binary search.

use deformwatch_types::{Observation, TemporalRange};

use super::store::PointHistory;

/// Observations with `low <= timestamp <= high`.
///
/// `observations` must be sorted by ascending timestamp. An inverted range
/// yields an empty slice.
pub fn filter_by_range<'a, R>(
    observations: &'a [Observation<R>],
    range: &TemporalRange,
) -> &'a [Observation<R>] {
    if range.is_inverted() {
        return &[];
    }
    let start = observations.partition_point(|o| o.timestamp < range.low);
    let end = observations.partition_point(|o| o.timestamp <= range.high);
    if start >= end {
        &[]
    } else {
        &observations[start..end]
    }
}

/// Whether a point belongs to the time-filtered point set.
///
/// Points without any observation always pass, whatever the window. Dated
/// points pass only when at least one observation lies in the window.
pub fn is_time_selected<R>(history: &PointHistory<R>, filtered: &[Observation<R>]) -> bool {
    !history.is_dated() || !filtered.is_empty()
}
