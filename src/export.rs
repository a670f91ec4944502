//! JSON export of derived state.
//!
//! Built from published snapshots, so an export always reflects one
//! consistent pass per sensor type.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use deformwatch_types::{MonitoringPoint, TemporalRange};
use serde::Serialize;

use crate::context::MonitoringContext;
use crate::data::alarm::AlarmLevel;
use crate::data::baseline::{ComponentValue, Delta};
use crate::data::histogram::MonthlyCounts;
use crate::data::store::LoadReport;
use crate::manager::{AlarmSummary, DerivedState, Manager};
use crate::sensor::{ProfileRow, SensorKind};

/// Derived state of one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointReport {
    pub name: String,
    pub group: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub time_filtered: bool,
    pub observations: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    pub zero: Option<NaiveDateTime>,
    pub rolling_reference: Option<NaiveDateTime>,
    pub alarm_level: AlarmLevel,
    pub alarm_percent: Option<f64>,
    pub delta_zero: Option<Vec<ComponentValue>>,
    pub delta_first: Option<Vec<ComponentValue>>,
    pub delta_rolling: Option<Vec<ComponentValue>>,
    /// Per-depth deltas; profile sensors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_zero: Option<Vec<ProfileRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_first: Option<Vec<ProfileRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_rolling: Option<Vec<ProfileRow>>,
}

impl PointReport {
    fn new<K: SensorKind>(
        point: &MonitoringPoint,
        state: &DerivedState<K::Reading>,
        time_filtered: bool,
    ) -> Self {
        let components =
            |delta: &Option<Delta<K::Reading>>| delta.as_ref().map(|d| d.components.clone());
        let profile = |delta: &Option<Delta<K::Reading>>| {
            delta.as_ref().and_then(|d| K::profile(&d.reading))
        };
        Self {
            name: point.name.clone(),
            group: point.group.clone(),
            category: point.category.clone(),
            status: point.status.clone(),
            time_filtered,
            observations: state.time_filtered.len(),
            first: state.first_filtered.as_ref().map(|o| o.timestamp),
            last: state.last_filtered.as_ref().map(|o| o.timestamp),
            zero: state.zero_observation.as_ref().map(|o| o.timestamp),
            rolling_reference: state.rolling_reference.as_ref().map(|o| o.timestamp),
            alarm_level: state.alarm_level,
            alarm_percent: state.alarm_percent,
            delta_zero: components(&state.delta_zero),
            delta_first: components(&state.delta_first),
            delta_rolling: components(&state.delta_rolling),
            profile_zero: profile(&state.delta_zero),
            profile_first: profile(&state.delta_first),
            profile_rolling: profile(&state.delta_rolling),
        }
    }
}

/// One registry entry, as listed in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

/// Everything exported for one sensor type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReport {
    pub sensor: &'static str,
    /// Component registry, in display order.
    pub components: Vec<ComponentInfo>,
    pub window: Option<TemporalRange>,
    pub summary: AlarmSummary,
    pub load: LoadReport,
    pub measurement_count_by_month: MonthlyCounts,
    pub points: Vec<PointReport>,
}

impl SensorReport {
    /// Report on the latest snapshot of `manager`; every filtered point is listed.
    pub fn from_manager<K: SensorKind>(manager: &Manager<K>) -> Self {
        let snapshot = manager.snapshot();
        let active: HashSet<&str> = snapshot
            .time_filtered
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let points = snapshot
            .filtered
            .iter()
            .filter_map(|point| {
                let state = snapshot.derived(&point.name)?;
                let time_filtered = active.contains(point.name.as_str());
                Some(PointReport::new::<K>(point, state, time_filtered))
            })
            .collect();

        let components = K::components()
            .iter()
            .map(|c| ComponentInfo {
                key: c.key,
                label: c.label,
                category: c.category.label(),
            })
            .collect();

        Self {
            sensor: K::NAME,
            components,
            window: snapshot.window,
            summary: snapshot.summary(),
            load: manager.load_report(),
            measurement_count_by_month: snapshot.measurement_count_by_month.clone(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub sensors: Vec<SensorReport>,
}

impl ExportDocument {
    pub fn from_context(context: &MonitoringContext) -> Self {
        Self {
            sensors: vec![
                SensorReport::from_manager(&context.tilt),
                SensorReport::from_manager(&context.displacement),
                SensorReport::from_manager(&context.inclinometer),
            ],
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::EvaluationSettings;
    use crate::source::ImportDocument;
    use serde_json::Value;

    const DOCUMENT: &str = r#"{
        "thresholds": [
            { "name": "T1", "components": { "height": {
                "range0": { "min": -0.02, "max": 0.02 },
                "range1": { "min": -0.06, "max": 0.06 } } } }
        ],
        "displacement": {
            "points": [
                { "name": "P1", "thresholds": ["T1"] },
                { "name": "P2", "thresholds": ["T1"] }
            ],
            "observations": [
                { "point": "P1", "timestamp": "2024-04-01", "is_zero": true,
                  "reading": { "east": 0.0, "north": 0.0, "height": 0.0 } },
                { "point": "P1", "timestamp": "2024-04-03",
                  "reading": { "east": 0.0, "north": 0.0, "height": 0.05 } }
            ]
        },
        "inclinometer": {
            "points": [ { "name": "I1" } ],
            "observations": [
                { "point": "I1", "timestamp": "2024-04-01", "is_zero": true,
                  "reading": [ { "depth": 0.5, "a": 0.0, "b": 0.0 },
                               { "depth": 1.0, "a": 1.0, "b": 1.0 } ] },
                { "point": "I1", "timestamp": "2024-04-05",
                  "reading": [ { "depth": 0.5, "a": 0.0, "b": 2.0 },
                               { "depth": 1.0, "a": 4.0, "b": 5.0 } ] }
            ]
        }
    }"#;

    fn export() -> Value {
        let document = ImportDocument::from_json(DOCUMENT).unwrap();
        let context = MonitoringContext::from_document(document, EvaluationSettings::default());
        let json = ExportDocument::from_context(&context).to_json_pretty().unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_export_lists_sensors_in_order() {
        let value = export();
        let sensors: Vec<&str> = value["sensors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["sensor"].as_str().unwrap())
            .collect();
        assert_eq!(sensors, vec!["tilt", "displacement", "inclinometer"]);
    }

    #[test]
    fn test_export_point_state() {
        let value = export();
        let displacement = &value["sensors"][1];
        assert_eq!(displacement["summary"]["warning"], 1);
        assert_eq!(displacement["summary"]["unknown"], 1);
        assert_eq!(displacement["load"]["observations"], 2);
        assert_eq!(displacement["measurement_count_by_month"]["2024-04"], 2);

        let p1 = &displacement["points"][0];
        assert_eq!(p1["name"], "P1");
        assert_eq!(p1["alarm_level"], 1);
        assert_eq!(p1["last"], "2024-04-03T00:00:00");
        assert_eq!(p1["delta_zero"][0]["key"], "height");

        let p2 = &displacement["points"][1];
        assert_eq!(p2["alarm_level"], -1);
        assert!(p2["alarm_percent"].is_null());
        assert_eq!(p2["time_filtered"], true);
    }

    #[test]
    fn test_export_lists_component_registry() {
        let value = export();
        let tilt = &value["sensors"][0]["components"];
        assert_eq!(tilt.as_array().unwrap().len(), 3);
        assert_eq!(tilt[0]["key"], "x");
        assert_eq!(tilt[0]["category"], "rotation");

        let height = &value["sensors"][1]["components"][0];
        assert_eq!(height["key"], "height");
        assert_eq!(height["label"], "Height (m)");
        assert_eq!(height["category"], "vertical");
    }

    #[test]
    fn test_export_inclinometer_profile_rows() {
        let value = export();
        let i1 = &value["sensors"][2]["points"][0];
        assert_eq!(i1["name"], "I1");

        let rows = i1["profile_zero"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["depth"], 0.5);
        assert_eq!(rows[0]["distance"], 2.0);
        assert_eq!(rows[0]["azimuth"], 90.0);
        assert_eq!(rows[1]["distance"], 5.0);
        assert_eq!(i1["profile_first"].as_array().unwrap().len(), 2);

        // scalar-only sensors carry no profile
        let p1 = &value["sensors"][1]["points"][0];
        assert!(p1.get("profile_zero").is_none());
    }

    #[test]
    fn test_export_marks_points_outside_window() {
        let document = ImportDocument::from_json(DOCUMENT).unwrap();
        let context = MonitoringContext::from_document(document, EvaluationSettings::default());
        let low = chrono::NaiveDate::from_ymd_opt(2024, 4, 4).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let high = chrono::NaiveDate::from_ymd_opt(2024, 4, 30).unwrap().and_hms_opt(0, 0, 0).unwrap();
        context.apply_temporal_filter(low, high);

        let export = ExportDocument::from_context(&context);
        let displacement = &export.sensors[1];
        let flags: Vec<(&str, bool)> = displacement
            .points
            .iter()
            .map(|p| (p.name.as_str(), p.time_filtered))
            .collect();
        assert_eq!(flags, vec![("P1", false), ("P2", true)]);
        assert!(export.sensors[2].points[0].time_filtered);
    }
}
