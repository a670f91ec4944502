//! Alarm thresholds - named pairs of nested bands per component.

use std::collections::BTreeMap;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Symmetric band `[-limit, limit]`.
    pub fn symmetric(limit: f64) -> Self {
        Self::new(-limit.abs(), limit.abs())
    }

    /// Inclusive membership test. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Largest absolute bound.
    pub fn magnitude(&self) -> f64 {
        self.min.abs().max(self.max.abs())
    }
}

/// Warning band (`range0`) and alarm band (`range1`) for one component.
///
/// `range0` is expected to lie inside `range1`; nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdBands {
    pub range0: Band,
    pub range1: Band,
}

impl ThresholdBands {
    pub const fn new(range0: Band, range1: Band) -> Self {
        Self { range0, range1 }
    }

    /// Whether the bands are nested as expected.
    pub fn is_nested(&self) -> bool {
        self.range1.min <= self.range0.min && self.range0.max <= self.range1.max
    }
}

/// A named alarm threshold definition.
///
/// Components are keyed by the sensor registry's component keys
/// (e.g. `"height"`, `"plane"`, `"distance_max"`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlarmThreshold {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub components: BTreeMap<String, ThresholdBands>,
}

impl AlarmThreshold {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: BTreeMap::new(),
        }
    }

    /// Add bands for a component.
    pub fn component(mut self, key: impl Into<String>, range0: Band, range1: Band) -> Self {
        self.components
            .insert(key.into(), ThresholdBands::new(range0, range1));
        self
    }

    /// Bands for a component, if defined.
    pub fn bands(&self, key: &str) -> Option<&ThresholdBands> {
        self.components.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_contains_is_inclusive() {
        let band = Band::new(-0.02, 0.02);
        assert!(band.contains(-0.02));
        assert!(band.contains(0.02));
        assert!(!band.contains(0.0201));
        assert!(!band.contains(f64::NAN));
    }

    #[test]
    fn test_band_magnitude() {
        assert_eq!(Band::new(-0.06, 0.04).magnitude(), 0.06);
        assert_eq!(Band::symmetric(-3.0), Band::new(-3.0, 3.0));
    }

    #[test]
    fn test_nesting() {
        let nested = ThresholdBands::new(Band::symmetric(1.0), Band::symmetric(2.0));
        let inverted = ThresholdBands::new(Band::symmetric(2.0), Band::symmetric(1.0));
        assert!(nested.is_nested());
        assert!(!inverted.is_nested());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_threshold() {
        let json = r#"{
            "name": "T1",
            "components": {
                "height": {
                    "range0": {"min": -0.02, "max": 0.02},
                    "range1": {"min": -0.06, "max": 0.06}
                }
            }
        }"#;
        let threshold: AlarmThreshold = serde_json::from_str(json).unwrap();
        assert_eq!(threshold.name, "T1");
        assert_eq!(threshold.bands("height").unwrap().range1.max, 0.06);
    }
}
