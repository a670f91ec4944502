//! The JSON import document.
//!
//! One document carries the threshold catalogue and one batch of points and
//! observations per sensor type:
//!
//! ```json
//! {
//!   "version": { "major": 1 },
//!   "thresholds": [ { "name": "T1", "components": { "height": { ... } } } ],
//!   "tilt":         { "points": [ ... ], "observations": [ ... ] },
//!   "displacement": { "points": [ ... ], "observations": [ ... ] },
//!   "inclinometer": { "points": [ ... ], "observations": [ ... ] }
//! }
//! ```
//!
//! Observation timestamps are read leniently. A timestamp that cannot be
//! parsed is kept as missing so the store can count and drop the record.

use deformwatch_types::{
    AlarmThreshold, Displacement, InclinometerProfile, MonitoringPoint, ObservationRecord,
    SchemaVersion, Tilt,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::data::timestamp::parse_timestamp;
use crate::error::{Error, Result};

/// An observation as written in the document, before timestamp parsing.
#[derive(Debug, Clone, Deserialize)]
struct RawObservation<R> {
    point: String,
    /// Any JSON value; only parseable strings become timestamps.
    #[serde(default)]
    timestamp: Option<Value>,
    reading: R,
    #[serde(default)]
    is_zero: bool,
    #[serde(default)]
    is_replacement: bool,
}

impl<R> RawObservation<R> {
    fn into_record(self) -> ObservationRecord<R> {
        let timestamp = match self.timestamp {
            None | Some(Value::Null) => None,
            Some(Value::String(ref s)) => match parse_timestamp(s) {
                Ok(t) => Some(t),
                Err(e) => {
                    debug!(point = %self.point, error = %e, "unparseable observation timestamp");
                    None
                }
            },
            Some(ref other) => {
                debug!(point = %self.point, value = %other, "observation timestamp is not a string");
                None
            }
        };
        ObservationRecord {
            point: self.point,
            timestamp,
            reading: self.reading,
            is_zero: self.is_zero,
            is_replacement: self.is_replacement,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
struct RawBatch<R> {
    #[serde(default)]
    points: Vec<MonitoringPoint>,
    #[serde(default)]
    observations: Vec<RawObservation<R>>,
}

impl<R> Default for RawBatch<R> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            observations: Vec::new(),
        }
    }
}

impl<R> From<RawBatch<R>> for SensorBatch<R> {
    fn from(raw: RawBatch<R>) -> Self {
        SensorBatch {
            points: raw.points,
            observations: raw
                .observations
                .into_iter()
                .map(RawObservation::into_record)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    version: Option<SchemaVersion>,
    #[serde(default)]
    thresholds: Vec<AlarmThreshold>,
    #[serde(default)]
    tilt: RawBatch<Tilt>,
    #[serde(default)]
    displacement: RawBatch<Displacement>,
    #[serde(default)]
    inclinometer: RawBatch<InclinometerProfile>,
}

/// Points and loader records of one sensor type.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorBatch<R> {
    pub points: Vec<MonitoringPoint>,
    pub observations: Vec<ObservationRecord<R>>,
}

impl<R> Default for SensorBatch<R> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            observations: Vec::new(),
        }
    }
}

impl<R> SensorBatch<R> {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.observations.is_empty()
    }
}

/// A complete import, ready to be handed to the managers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportDocument {
    pub version: SchemaVersion,
    pub thresholds: Vec<AlarmThreshold>,
    pub tilt: SensorBatch<Tilt>,
    pub displacement: SensorBatch<Displacement>,
    pub inclinometer: SensorBatch<InclinometerProfile>,
}

impl ImportDocument {
    /// Parse a document from JSON and check its schema version.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;
        let version = raw.version.unwrap_or_default();
        if !version.is_compatible() {
            return Err(Error::UnsupportedSchema(version.to_string()));
        }
        Ok(Self {
            version,
            thresholds: raw.thresholds,
            tilt: raw.tilt.into(),
            displacement: raw.displacement.into(),
            inclinometer: raw.inclinometer.into(),
        })
    }

    /// Total number of points over all sensor types.
    pub fn point_count(&self) -> usize {
        self.tilt.points.len() + self.displacement.points.len() + self.inclinometer.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilt.is_empty() && self.displacement.is_empty() && self.inclinometer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = r#"{
        "thresholds": [
            {
                "name": "T1",
                "components": {
                    "height": {
                        "range0": { "min": -0.02, "max": 0.02 },
                        "range1": { "min": -0.06, "max": 0.06 }
                    }
                }
            }
        ],
        "displacement": {
            "points": [ { "name": "P1", "thresholds": ["T1"] } ],
            "observations": [
                { "point": "P1", "timestamp": "2024-04-01", "is_zero": true,
                  "reading": { "east": 0.0, "north": 0.0, "height": 0.0 } },
                { "point": "P1", "timestamp": "2024-04-02 09:30:00",
                  "reading": { "east": 0.0, "north": 0.0, "height": 0.01 } },
                { "point": "P1", "timestamp": "yesterday",
                  "reading": { "east": 0.0, "north": 0.0, "height": 0.02 } }
            ]
        },
        "inclinometer": {
            "points": [ { "name": "I1" } ],
            "observations": [
                { "point": "I1", "timestamp": "2024-04-01T08:00:00",
                  "reading": [ { "depth": 0.5, "a": 1.0, "b": 2.0 } ] }
            ]
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let doc = ImportDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.version, SchemaVersion::current());
        assert_eq!(doc.thresholds.len(), 1);
        assert!(doc.tilt.is_empty());
        assert_eq!(doc.point_count(), 2);

        let obs = &doc.displacement.observations;
        assert_eq!(obs.len(), 3);
        assert!(obs[0].is_zero);
        assert_eq!(
            obs[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            obs[1].timestamp,
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap().and_hms_opt(9, 30, 0)
        );
        assert_eq!(obs[2].timestamp, None);

        let profile = &doc.inclinometer.observations[0].reading;
        assert_eq!(profile.depths.len(), 1);
    }

    #[test]
    fn test_non_string_timestamp_is_missing() {
        let doc = ImportDocument::from_json(
            r#"{
                "tilt": {
                    "points": [ { "name": "T-01" } ],
                    "observations": [
                        { "point": "T-01", "timestamp": "2024-01-01T00:00:00",
                          "reading": { "x": 0.1, "y": 0.2 } },
                        { "point": "T-01", "timestamp": 1704067200,
                          "reading": { "x": 0.3, "y": 0.4 } },
                        { "point": "T-01", "timestamp": null,
                          "reading": { "x": 0.5, "y": 0.6 } }
                    ]
                }
            }"#,
        )
        .unwrap();

        let obs = &doc.tilt.observations;
        assert_eq!(obs.len(), 3);
        assert_eq!(
            obs[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(obs[1].timestamp, None);
        assert_eq!(obs[2].timestamp, None);
    }

    #[test]
    fn test_empty_document() {
        let doc = ImportDocument::from_json("{}").unwrap();
        assert!(doc.is_empty());
        assert!(doc.thresholds.is_empty());
    }

    #[test]
    fn test_incompatible_version() {
        let err = ImportDocument::from_json(r#"{"version": {"major": 2}}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSchema(v) if v == "2.0"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ImportDocument::from_json("not json"),
            Err(Error::Json(_))
        ));
    }
}
