use deformwatch_types::InclinometerProfile;

use super::{finite, Component, ComponentCategory, ProfileRow, SensorKind};

/// In-place and probe inclinometers measuring a displacement profile.
///
/// Deltas are taken per depth over the depths both profiles share.
#[derive(Debug, Clone, Copy, Default)]
pub struct InclinometerSensor;

static COMPONENTS: &[Component<InclinometerProfile>] = &[
    Component {
        key: "distance_max",
        label: "Max distance (mm)",
        category: ComponentCategory::Profile,
        extract: |p| p.max_distance().and_then(finite),
    },
    Component {
        key: "distance_top",
        label: "Top distance (mm)",
        category: ComponentCategory::Profile,
        extract: |p| p.top().map(|r| r.distance()).and_then(finite),
    },
    Component {
        key: "a_top",
        label: "Top A (mm)",
        category: ComponentCategory::Horizontal,
        extract: |p| p.top().map(|r| r.a).and_then(finite),
    },
    Component {
        key: "b_top",
        label: "Top B (mm)",
        category: ComponentCategory::Horizontal,
        extract: |p| p.top().map(|r| r.b).and_then(finite),
    },
];

impl SensorKind for InclinometerSensor {
    type Reading = InclinometerProfile;

    const NAME: &'static str = "inclinometer";

    fn difference(
        latest: &InclinometerProfile,
        base: &InclinometerProfile,
    ) -> Option<InclinometerProfile> {
        latest.difference(base)
    }

    fn components() -> &'static [Component<InclinometerProfile>] {
        COMPONENTS
    }

    fn profile(delta: &InclinometerProfile) -> Option<Vec<ProfileRow>> {
        let rows = delta
            .depths
            .iter()
            .map(|r| ProfileRow {
                depth: r.depth,
                a: r.a,
                b: r.b,
                distance: r.distance(),
                azimuth: r.azimuth(),
            })
            .collect();
        Some(rows)
    }
}
