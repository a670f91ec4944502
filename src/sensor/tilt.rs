use deformwatch_types::Tilt;

use super::{finite, Component, ComponentCategory, SensorKind};

/// Two-axis tilt sensors (tiltmeters, tilt beams).
#[derive(Debug, Clone, Copy, Default)]
pub struct TiltSensor;

static COMPONENTS: &[Component<Tilt>] = &[
    Component {
        key: "x",
        label: "Tilt X (mm/m)",
        category: ComponentCategory::Rotation,
        extract: |t| finite(t.x),
    },
    Component {
        key: "y",
        label: "Tilt Y (mm/m)",
        category: ComponentCategory::Rotation,
        extract: |t| finite(t.y),
    },
    Component {
        key: "resultant",
        label: "Tilt resultant (mm/m)",
        category: ComponentCategory::Rotation,
        extract: |t| finite(t.resultant()),
    },
];

impl SensorKind for TiltSensor {
    type Reading = Tilt;

    const NAME: &'static str = "tilt";

    fn difference(latest: &Tilt, base: &Tilt) -> Option<Tilt> {
        Some(latest.difference(base))
    }

    fn components() -> &'static [Component<Tilt>] {
        COMPONENTS
    }
}
