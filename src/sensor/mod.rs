//! Sensor types and their component registries.
//!
//! Every sensor type plugs into the shared evaluation pipeline through
//! [`SensorKind`]: how two readings are differenced, and which scalar
//! components of a delta are exposed for thresholds and display.
//!
//! ## Registries
//!
//! A registry is an ordered, static table of [`Component`]s. Extractors are
//! plain functions that must be total: they return `None` instead of
//! panicking when a value cannot be derived.
//!
//! - [`TiltSensor`]: `x`, `y`, `resultant`
//! - [`PrismSensor`]: `height`, `plane`, `east`, `north`
//! - [`InclinometerSensor`]: `distance_max`, `distance_top`, `a_top`, `b_top`

mod displacement;
mod inclinometer;
mod tilt;

pub use displacement::PrismSensor;
pub use inclinometer::InclinometerSensor;
pub use tilt::TiltSensor;

use std::fmt::Debug;

use serde::Serialize;

/// Rough grouping of components, used to order and label output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentCategory {
    Vertical,
    Horizontal,
    Rotation,
    Profile,
}

impl ComponentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentCategory::Vertical => "vertical",
            ComponentCategory::Horizontal => "horizontal",
            ComponentCategory::Rotation => "rotation",
            ComponentCategory::Profile => "profile",
        }
    }
}

/// One registry entry: a named scalar extracted from a delta reading.
pub struct Component<R: 'static> {
    /// Key used by threshold definitions.
    pub key: &'static str,
    /// Human-readable label, with unit.
    pub label: &'static str,
    pub category: ComponentCategory,
    pub extract: fn(&R) -> Option<f64>,
}

impl<R> Debug for Component<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("category", &self.category)
            .finish()
    }
}

/// A sensor type evaluated by its own [`Manager`](crate::Manager).
pub trait SensorKind: Send + Sync + 'static {
    /// Measured values carried by one observation.
    type Reading: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Short name used in logs, CLI output and import sections.
    const NAME: &'static str;

    /// Component-wise `latest - base`.
    ///
    /// Returns `None` when the two readings cannot be compared
    /// (e.g. inclinometer profiles without a common depth).
    fn difference(latest: &Self::Reading, base: &Self::Reading) -> Option<Self::Reading>;

    /// The ordered component registry for this sensor type.
    fn components() -> &'static [Component<Self::Reading>];

    /// Per-depth rows of a delta reading. Only profile sensors have them.
    fn profile(_delta: &Self::Reading) -> Option<Vec<ProfileRow>> {
        None
    }

    /// Look up a registry entry by key.
    fn component(key: &str) -> Option<&'static Component<Self::Reading>> {
        Self::components().iter().find(|c| c.key == key)
    }
}

/// One depth of a profile delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileRow {
    pub depth: f64,
    pub a: f64,
    pub b: f64,
    pub distance: f64,
    /// Degrees clockwise from the A axis.
    pub azimuth: f64,
}

/// Keep only finite values; extractors may produce NaN on degenerate input.
pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
