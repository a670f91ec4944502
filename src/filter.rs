//! Static (non-temporal) point filters.
//!
//! The manager only needs a predicate over points; UIs may bring their own
//! [`PointFilter`]. [`StaticFilter`] covers the usual category / group /
//! status / origin / free-text selection.

use std::collections::BTreeSet;
use std::fmt::Debug;

use deformwatch_types::MonitoringPoint;

/// Predicate deciding which points take part in evaluation.
pub trait PointFilter: Send + Sync + Debug {
    fn accepts(&self, point: &MonitoringPoint) -> bool;
}

/// Accepts every point.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PointFilter for AcceptAll {
    fn accepts(&self, _point: &MonitoringPoint) -> bool {
        true
    }
}

/// Attribute and free-text filter.
///
/// An empty set means "no restriction" for that attribute. Points lacking an
/// attribute never match a non-empty set for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFilter {
    pub categories: BTreeSet<String>,
    pub groups: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    pub origins: BTreeSet<String>,
    /// Case-insensitive substring matched against name and group.
    pub text: String,
}

impl StaticFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.statuses.insert(status.into());
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origins.insert(origin.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.groups.is_empty()
            && self.statuses.is_empty()
            && self.origins.is_empty()
            && self.text.is_empty()
    }

    fn matches_text(&self, point: &MonitoringPoint) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let search = self.text.to_lowercase();
        point.name.to_lowercase().contains(&search)
            || point
                .group
                .as_ref()
                .is_some_and(|g| g.to_lowercase().contains(&search))
    }
}

fn matches_set(set: &BTreeSet<String>, value: Option<&String>) -> bool {
    set.is_empty() || value.is_some_and(|v| set.contains(v))
}

impl PointFilter for StaticFilter {
    fn accepts(&self, point: &MonitoringPoint) -> bool {
        matches_set(&self.categories, point.category.as_ref())
            && matches_set(&self.groups, point.group.as_ref())
            && matches_set(&self.statuses, point.status.as_ref())
            && matches_set(&self.origins, point.origin.as_ref())
            && self.matches_text(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<MonitoringPoint> {
        vec![
            MonitoringPoint::new("INC-01").with_group("Quay").with_category("inclinometer"),
            MonitoringPoint::new("PR-17").with_group("Quay").with_origin("survey"),
            MonitoringPoint::new("PR-18").with_group("Tunnel").with_origin("survey"),
            MonitoringPoint::new("TL-02"),
        ]
    }

    fn accepted(filter: &dyn PointFilter) -> Vec<String> {
        points()
            .into_iter()
            .filter(|p| filter.accepts(p))
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn test_empty_filter_accepts_all() {
        let filter = StaticFilter::new();
        assert!(filter.is_empty());
        assert_eq!(accepted(&filter).len(), 4);
        assert_eq!(accepted(&AcceptAll).len(), 4);
    }

    #[test]
    fn test_attribute_sets_combine_with_and() {
        let filter = StaticFilter::new().group("Quay").origin("survey");
        assert_eq!(accepted(&filter), vec!["PR-17"]);
    }

    #[test]
    fn test_missing_attribute_does_not_match() {
        let filter = StaticFilter::new().category("inclinometer");
        assert_eq!(accepted(&filter), vec!["INC-01"]);
    }

    #[test]
    fn test_text_matches_name_and_group() {
        assert_eq!(accepted(&StaticFilter::new().text("pr-1")), vec!["PR-17", "PR-18"]);
        assert_eq!(accepted(&StaticFilter::new().text("tunnel")), vec!["PR-18"]);
    }
}
