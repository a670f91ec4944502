//! Monitoring point - the static identity of one instrument.

use chrono::NaiveDateTime;

/// WGS84 position of a monitoring point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in metres, if surveyed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: Option<f64>,
}

/// Period during which a point's measurements are considered valid.
///
/// Either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Validity {
    #[cfg_attr(feature = "serde", serde(default))]
    pub from: Option<NaiveDateTime>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub to: Option<NaiveDateTime>,
}

impl Validity {
    /// Check whether `t` falls inside the validity interval (inclusive).
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.from.map_or(true, |from| t >= from) && self.to.map_or(true, |to| t <= to)
    }
}

/// A monitoring point and its static metadata.
///
/// The name is the unique key within one sensor type. Points are immutable
/// once loaded; everything derived from their observations lives elsewhere.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitoringPoint {
    pub name: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<String>,

    /// Where the point's data comes from (vendor, survey campaign, ...).
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<GeoPosition>,

    /// Orientation of the instrument's A axis, degrees from north.
    #[cfg_attr(feature = "serde", serde(default))]
    pub azimuth: Option<f64>,

    /// Date the zero measurement was declared for, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub zero_date: Option<NaiveDateTime>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub validity: Validity,

    /// Nominal interval between measurements, in hours.
    #[cfg_attr(feature = "serde", serde(default))]
    pub frequency_hours: Option<u32>,

    /// Names of the alarm thresholds this point is evaluated against.
    #[cfg_attr(feature = "serde", serde(default))]
    pub thresholds: Vec<String>,
}

impl MonitoringPoint {
    /// Create a point with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.position = Some(GeoPosition {
            latitude,
            longitude,
            elevation: None,
        });
        self
    }

    pub fn with_zero_date(mut self, zero_date: NaiveDateTime) -> Self {
        self.zero_date = Some(zero_date);
        self
    }

    /// Add a reference to a named alarm threshold.
    pub fn with_threshold(mut self, threshold: impl Into<String>) -> Self {
        self.thresholds.push(threshold.into());
        self
    }
}
