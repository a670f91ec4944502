//! Observations - single measurement events for a point.

use chrono::NaiveDateTime;

/// One measurement of a point, as handed over by the data loader.
///
/// The timestamp may be missing when the source row could not be dated.
/// Such records never make it into the store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationRecord<R> {
    /// Name of the point this observation belongs to.
    pub point: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: Option<NaiveDateTime>,

    pub reading: R,

    #[cfg_attr(feature = "serde", serde(default))]
    pub is_zero: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub is_replacement: bool,
}

impl<R> ObservationRecord<R> {
    /// Turn the record into a dated observation.
    ///
    /// Returns `None` if the record has no timestamp.
    pub fn into_observation(self) -> Option<Observation<R>> {
        let timestamp = self.timestamp?;
        Some(Observation {
            point: self.point,
            timestamp,
            reading: self.reading,
            is_zero: self.is_zero,
            is_replacement: self.is_replacement,
        })
    }
}

/// A dated measurement of a point.
///
/// `point` is the back-reference to the owning [`MonitoringPoint`](crate::MonitoringPoint).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation<R> {
    pub point: String,
    pub timestamp: NaiveDateTime,
    pub reading: R,
    /// This observation is the point's declared zero measurement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_zero: bool,
    /// This observation replaces an earlier, discarded one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_replacement: bool,
}

impl<R> Observation<R> {
    pub fn new(point: impl Into<String>, timestamp: NaiveDateTime, reading: R) -> Self {
        Self {
            point: point.into(),
            timestamp,
            reading,
            is_zero: false,
            is_replacement: false,
        }
    }

    /// Flag this observation as a zero measurement.
    pub fn zero(mut self) -> Self {
        self.is_zero = true;
        self
    }

    /// Flag this observation as a replacement measurement.
    pub fn replacement(mut self) -> Self {
        self.is_replacement = true;
        self
    }

    /// Convert back into a loader record.
    pub fn into_record(self) -> ObservationRecord<R> {
        ObservationRecord {
            point: self.point,
            timestamp: Some(self.timestamp),
            reading: self.reading,
            is_zero: self.is_zero,
            is_replacement: self.is_replacement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tilt;
    use chrono::NaiveDate;

    #[test]
    fn test_undated_record_has_no_observation() {
        let record = ObservationRecord {
            point: "T1".to_string(),
            timestamp: None,
            reading: Tilt::new(0.1, 0.2),
            is_zero: true,
            is_replacement: false,
        };
        assert!(record.into_observation().is_none());
    }

    #[test]
    fn test_record_keeps_flags() {
        let t = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let obs = Observation::new("T1", t, Tilt::new(0.1, 0.2)).zero().replacement();
        let back = obs.clone().into_record().into_observation().unwrap();
        assert_eq!(back, obs);
        assert!(back.is_zero && back.is_replacement);
    }
}
