//! Sensor readings - the measured values carried by an observation.
//!
//! Each sensor type has its own reading shape. Differences between two
//! readings keep the same shape, so a delta is itself a reading.

/// Depths closer than this (metres) are treated as the same probe station.
pub const DEPTH_TOLERANCE: f64 = 1e-6;

/// Two-axis tilt in mm/m.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tilt {
    pub x: f64,
    pub y: f64,
}

impl Tilt {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - base`.
    pub fn difference(&self, base: &Tilt) -> Tilt {
        Tilt {
            x: self.x - base.x,
            y: self.y - base.y,
        }
    }

    /// Magnitude of the tilt vector.
    pub fn resultant(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Survey prism position (or displacement) in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Displacement {
    pub east: f64,
    pub north: f64,
    pub height: f64,
}

impl Displacement {
    pub const fn new(east: f64, north: f64, height: f64) -> Self {
        Self {
            east,
            north,
            height,
        }
    }

    /// Component-wise `self - base`.
    pub fn difference(&self, base: &Displacement) -> Displacement {
        Displacement {
            east: self.east - base.east,
            north: self.north - base.north,
            height: self.height - base.height,
        }
    }

    /// Horizontal (in-plane) magnitude.
    pub fn plane(&self) -> f64 {
        self.east.hypot(self.north)
    }
}

/// Cumulative displacement of one inclinometer probe station, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthReading {
    /// Depth below the casing top, metres.
    pub depth: f64,
    /// Displacement along the A axis.
    pub a: f64,
    /// Displacement along the B axis.
    pub b: f64,
}

impl DepthReading {
    pub const fn new(depth: f64, a: f64, b: f64) -> Self {
        Self { depth, a, b }
    }

    /// Horizontal distance at this depth.
    pub fn distance(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Direction of the displacement, degrees clockwise from the A axis in `[0, 360)`.
    pub fn azimuth(&self) -> f64 {
        let deg = self.b.atan2(self.a).to_degrees();
        if deg < 0.0 {
            deg + 360.0
        } else {
            deg
        }
    }
}

/// A full inclinometer profile: one reading per probe depth.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InclinometerProfile {
    pub depths: Vec<DepthReading>,
}

impl InclinometerProfile {
    pub fn new(mut depths: Vec<DepthReading>) -> Self {
        depths.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { depths }
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// The shallowest probe station.
    pub fn top(&self) -> Option<&DepthReading> {
        self.depths.iter().min_by(|a, b| a.depth.total_cmp(&b.depth))
    }

    /// Reading at `depth`, within [`DEPTH_TOLERANCE`].
    pub fn at_depth(&self, depth: f64) -> Option<&DepthReading> {
        self.depths
            .iter()
            .find(|r| (r.depth - depth).abs() <= DEPTH_TOLERANCE)
    }

    /// Per-depth `self - base`, over the depths present in both profiles.
    ///
    /// Returns `None` when the profiles share no depth.
    pub fn difference(&self, base: &InclinometerProfile) -> Option<InclinometerProfile> {
        let depths: Vec<DepthReading> = self
            .depths
            .iter()
            .filter_map(|r| {
                base.at_depth(r.depth)
                    .map(|b| DepthReading::new(r.depth, r.a - b.a, r.b - b.b))
            })
            .collect();

        if depths.is_empty() {
            None
        } else {
            Some(InclinometerProfile::new(depths))
        }
    }

    /// Largest horizontal distance over all depths.
    pub fn max_distance(&self) -> Option<f64> {
        self.depths.iter().map(DepthReading::distance).reduce(f64::max)
    }
}
