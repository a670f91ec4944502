use deformwatch_types::Displacement;

use super::{finite, Component, ComponentCategory, SensorKind};

/// Survey prisms and other 3D point targets.
///
/// `plane` is computed from the east/north deltas, never as a difference of
/// two planar magnitudes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrismSensor;

static COMPONENTS: &[Component<Displacement>] = &[
    Component {
        key: "height",
        label: "Height (m)",
        category: ComponentCategory::Vertical,
        extract: |d| finite(d.height),
    },
    Component {
        key: "plane",
        label: "Plane (m)",
        category: ComponentCategory::Horizontal,
        extract: |d| finite(d.plane()),
    },
    Component {
        key: "east",
        label: "East (m)",
        category: ComponentCategory::Horizontal,
        extract: |d| finite(d.east),
    },
    Component {
        key: "north",
        label: "North (m)",
        category: ComponentCategory::Horizontal,
        extract: |d| finite(d.north),
    },
];

impl SensorKind for PrismSensor {
    type Reading = Displacement;

    const NAME: &'static str = "displacement";

    fn difference(latest: &Displacement, base: &Displacement) -> Option<Displacement> {
        Some(latest.difference(base))
    }

    fn components() -> &'static [Component<Displacement>] {
        COMPONENTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_of_opposite_moves() {
        // Both positions sit 3 mm from the origin; the plane delta is the
        // 6 mm between them, not the difference of their magnitudes.
        let a = Displacement::new(0.003, 0.0, 0.0);
        let b = Displacement::new(-0.003, 0.0, 0.0);
        let delta = PrismSensor::difference(&a, &b).unwrap();
        let plane = PrismSensor::component("plane").unwrap();
        assert!(((plane.extract)(&delta).unwrap() - 0.006).abs() < 1e-12);
    }

    #[test]
    fn test_height_is_vertical() {
        let height = PrismSensor::component("height").unwrap();
        assert_eq!(height.category, ComponentCategory::Vertical);
    }
}
