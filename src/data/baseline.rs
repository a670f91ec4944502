//! Baseline selection and delta computation.
//!
//! Three baselines are compared against the latest time-filtered
//! observation:
//!
//! - the **zero** measurement: earliest zero-flagged observation of the whole
//!   raw history, regardless of the window;
//! - the **first** observation inside the window;
//! - a **rolling** reference chosen by [`RollingBaseline`].
//!
//! Every delta is recomputed from raw readings; nothing is carried over
//! between passes.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use deformwatch_types::Observation;
use serde::{Deserialize, Serialize};

use super::duration::{format_period, parse_period};
use crate::error::Error;
use crate::sensor::SensorKind;

/// How the rolling reference observation is chosen.
///
/// Parsed from `"off"`, a period such as `"30d"` / `"12h"` / `"2w"`, or an
/// observation count such as `"5obs"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingBaseline {
    /// No rolling delta is computed.
    Disabled,
    /// Most recent filtered observation at least this long before the latest one.
    Period(Duration),
    /// The filtered observation this many positions before the latest one.
    Observations(usize),
}

impl Default for RollingBaseline {
    fn default() -> Self {
        RollingBaseline::Period(Duration::days(30))
    }
}

impl FromStr for RollingBaseline {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("off") || s.eq_ignore_ascii_case("disabled") {
            return Ok(RollingBaseline::Disabled);
        }
        if let Some(count) = s.strip_suffix("obs") {
            return count
                .trim()
                .parse()
                .map(RollingBaseline::Observations)
                .map_err(|_| Error::InvalidDuration(s.to_string()));
        }
        parse_period(s).map(RollingBaseline::Period)
    }
}

impl fmt::Display for RollingBaseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollingBaseline::Disabled => write!(f, "off"),
            RollingBaseline::Period(d) => write!(f, "{}", format_period(*d)),
            RollingBaseline::Observations(n) => write!(f, "{}obs", n),
        }
    }
}

/// Which delta drives alarm evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmBasis {
    #[default]
    Zero,
    First,
    Rolling,
}

impl FromStr for AlarmBasis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(AlarmBasis::Zero),
            "first" => Ok(AlarmBasis::First),
            "rolling" => Ok(AlarmBasis::Rolling),
            _ => Err(Error::InvalidAlarmBasis(s.to_string())),
        }
    }
}

impl fmt::Display for AlarmBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmBasis::Zero => write!(f, "zero"),
            AlarmBasis::First => write!(f, "first"),
            AlarmBasis::Rolling => write!(f, "rolling"),
        }
    }
}

/// One named scalar of a delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentValue {
    pub key: &'static str,
    pub value: f64,
}

/// Structured difference between two readings.
///
/// Keeps the raw per-channel difference (`reading`) and the registry
/// components extracted from it. Components whose extractor yields nothing
/// are simply missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta<R> {
    pub reading: R,
    pub components: Vec<ComponentValue>,
}

impl<R: 'static> Delta<R> {
    /// `latest - base` for sensor type `K`.
    pub fn between<K>(latest: &R, base: &R) -> Option<Self>
    where
        K: SensorKind<Reading = R>,
    {
        let reading = K::difference(latest, base)?;
        let components = K::components()
            .iter()
            .filter_map(|c| {
                (c.extract)(&reading).map(|value| ComponentValue { key: c.key, value })
            })
            .collect();
        Some(Self {
            reading,
            components,
        })
    }
}

impl<R> Delta<R> {
    /// Value of a component, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.value)
    }
}

/// Baselines and deltas of one point for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct Baselines<R> {
    pub first_filtered: Option<Observation<R>>,
    pub last_filtered: Option<Observation<R>>,
    pub zero_observation: Option<Observation<R>>,
    pub rolling_reference: Option<Observation<R>>,
    pub delta_zero: Option<Delta<R>>,
    pub delta_first: Option<Delta<R>>,
    pub delta_rolling: Option<Delta<R>>,
}

impl<R> Baselines<R> {
    /// The delta selected by `basis`.
    pub fn delta_for(&self, basis: AlarmBasis) -> Option<&Delta<R>> {
        match basis {
            AlarmBasis::Zero => self.delta_zero.as_ref(),
            AlarmBasis::First => self.delta_first.as_ref(),
            AlarmBasis::Rolling => self.delta_rolling.as_ref(),
        }
    }
}

/// Earliest zero-flagged observation of a sorted raw history.
pub fn zero_observation<R>(raw: &[Observation<R>]) -> Option<&Observation<R>> {
    raw.iter().find(|o| o.is_zero)
}

/// Rolling reference for the last observation of a sorted filtered list.
pub fn rolling_reference<R>(
    filtered: &[Observation<R>],
    policy: RollingBaseline,
) -> Option<&Observation<R>> {
    let (last, earlier) = filtered.split_last()?;
    match policy {
        RollingBaseline::Disabled => None,
        RollingBaseline::Period(period) => {
            let cutoff = last.timestamp.checked_sub_signed(period)?;
            earlier.iter().rev().find(|o| o.timestamp <= cutoff)
        }
        RollingBaseline::Observations(0) => None,
        RollingBaseline::Observations(n) => {
            earlier.len().checked_sub(n).map(|idx| &earlier[idx])
        }
    }
}

/// Select baselines and compute all deltas for one point.
pub fn compute<K: SensorKind>(
    raw: &[Observation<K::Reading>],
    filtered: &[Observation<K::Reading>],
    policy: RollingBaseline,
) -> Baselines<K::Reading> {
    let first = filtered.first();
    let last = filtered.last();
    let zero = zero_observation(raw);
    let rolling = rolling_reference(filtered, policy);

    let delta = |base: Option<&Observation<K::Reading>>| {
        let (last, base) = (last?, base?);
        Delta::between::<K>(&last.reading, &base.reading)
    };

    Baselines {
        delta_zero: delta(zero),
        delta_first: delta(first),
        delta_rolling: delta(rolling),
        first_filtered: first.cloned(),
        last_filtered: last.cloned(),
        zero_observation: zero.cloned(),
        rolling_reference: rolling.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{PrismSensor, TiltSensor};
    use chrono::{NaiveDate, NaiveDateTime};
    use deformwatch_types::{Displacement, Tilt};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(6, 0, 0).unwrap()
    }

    fn prism(d: u32, height: f64) -> Observation<Displacement> {
        Observation::new("P1", day(d), Displacement::new(100.0, 200.0, height))
    }

    fn height_of<R>(delta: &Delta<R>) -> Option<f64> {
        delta.get("height")
    }

    #[test]
    fn test_delta_components_read_without_sensor_type() {
        let delta = Delta::between::<PrismSensor>(
            &Displacement::new(100.0, 200.0, 0.5),
            &Displacement::new(100.0, 200.0, 0.2),
        )
        .unwrap();
        assert!((height_of(&delta).unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(delta.get("plane"), Some(0.0));
        assert_eq!(delta.get("resultant"), None);
    }

    #[test]
    fn test_zero_is_earliest_flagged_raw() {
        let raw = vec![
            prism(1, 0.0),
            prism(2, 0.01).zero(),
            prism(3, 0.02).zero(),
        ];
        assert_eq!(zero_observation(&raw).unwrap().timestamp, day(2));
        assert!(zero_observation(&raw[..1]).is_none());
    }

    #[test]
    fn test_zero_outside_window_still_used() {
        let raw = vec![prism(1, 0.0).zero(), prism(5, 0.01), prism(9, 0.03)];
        let filtered = &raw[1..];
        let b = compute::<PrismSensor>(&raw, filtered, RollingBaseline::Disabled);

        assert_eq!(b.zero_observation.as_ref().unwrap().timestamp, day(1));
        let dz = b.delta_zero.unwrap().get("height").unwrap();
        assert!((dz - 0.03).abs() < 1e-12);
        let df = b.delta_first.unwrap().get("height").unwrap();
        assert!((df - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_no_zero_flag_means_no_zero_delta() {
        let raw = vec![prism(1, 0.0), prism(2, 0.01)];
        let b = compute::<PrismSensor>(&raw, &raw, RollingBaseline::default());
        assert!(b.zero_observation.is_none());
        assert!(b.delta_zero.is_none());
        assert!(b.delta_first.is_some());
    }

    #[test]
    fn test_empty_window_has_no_deltas() {
        let raw = vec![prism(1, 0.0).zero(), prism(2, 0.01)];
        let b = compute::<PrismSensor>(&raw, &[], RollingBaseline::default());
        assert!(b.zero_observation.is_some());
        assert!(b.last_filtered.is_none());
        assert!(b.delta_zero.is_none());
        assert!(b.delta_first.is_none());
        assert!(b.delta_rolling.is_none());
    }

    #[test]
    fn test_single_observation_first_delta_is_zero() {
        let raw = vec![prism(4, 0.5)];
        let b = compute::<PrismSensor>(&raw, &raw, RollingBaseline::default());
        assert_eq!(b.delta_first.unwrap().get("height"), Some(0.0));
    }

    #[test]
    fn test_rolling_by_period() {
        let raw = vec![prism(1, 0.0), prism(3, 0.0), prism(8, 0.0), prism(10, 0.0)];
        let policy = RollingBaseline::Period(Duration::days(5));
        // cutoff is day 5: day 3 is the most recent observation at or before it
        assert_eq!(rolling_reference(&raw, policy).unwrap().timestamp, day(3));

        let policy = RollingBaseline::Period(Duration::days(2));
        assert_eq!(rolling_reference(&raw, policy).unwrap().timestamp, day(8));

        let policy = RollingBaseline::Period(Duration::days(30));
        assert!(rolling_reference(&raw, policy).is_none());
    }

    #[test]
    fn test_rolling_by_count() {
        let raw = vec![prism(1, 0.0), prism(2, 0.0), prism(3, 0.0)];
        assert_eq!(
            rolling_reference(&raw, RollingBaseline::Observations(1)).unwrap().timestamp,
            day(2)
        );
        assert_eq!(
            rolling_reference(&raw, RollingBaseline::Observations(2)).unwrap().timestamp,
            day(1)
        );
        assert!(rolling_reference(&raw, RollingBaseline::Observations(3)).is_none());
        assert!(rolling_reference(&raw, RollingBaseline::Observations(0)).is_none());
        assert!(rolling_reference(&raw, RollingBaseline::Disabled).is_none());
    }

    #[test]
    fn test_delta_is_structured() {
        let latest = Tilt::new(1.0, 2.0);
        let base = Tilt::new(0.5, 0.5);
        let delta = Delta::between::<TiltSensor>(&latest, &base).unwrap();
        assert_eq!(delta.reading, Tilt::new(0.5, 1.5));
        assert_eq!(delta.get("x"), Some(0.5));
        assert_eq!(delta.get("y"), Some(1.5));
        assert!(delta.get("height").is_none());
    }

    #[test]
    fn test_rolling_baseline_parsing() {
        assert_eq!("off".parse::<RollingBaseline>().unwrap(), RollingBaseline::Disabled);
        assert_eq!(
            "30d".parse::<RollingBaseline>().unwrap(),
            RollingBaseline::Period(Duration::days(30))
        );
        assert_eq!(
            "5obs".parse::<RollingBaseline>().unwrap(),
            RollingBaseline::Observations(5)
        );
        assert!("five".parse::<RollingBaseline>().is_err());
        assert_eq!(RollingBaseline::default().to_string(), "30d");
    }

    #[test]
    fn test_alarm_basis_parsing() {
        assert_eq!("Rolling".parse::<AlarmBasis>().unwrap(), AlarmBasis::Rolling);
        assert!("latest".parse::<AlarmBasis>().is_err());
        assert_eq!(AlarmBasis::default(), AlarmBasis::Zero);
    }
}
