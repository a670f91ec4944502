//! # deformwatch-types
//!
//! Core types for deformation monitoring. This crate defines the records a
//! data loader hands to the evaluation engine: monitoring points, their
//! time-stamped observations, the per-sensor-type readings carried by those
//! observations, and the named alarm thresholds points refer to.
//!
//! ## Design Goals
//!
//! - **Plain data**: no evaluation logic lives here, only shapes and small helpers
//! - **Optional serialization**: enable the `serde` feature for JSON and friends
//! - **Absent is not zero**: every "not available" value is an `Option`
//! - **Versioned import schema**: import documents carry a schema version
//!
//! ## Features
//!
//! - `serde`: serialization via serde (also enables `chrono/serde`)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use deformwatch_types::{AlarmThreshold, Band, Displacement, MonitoringPoint, Observation};
//!
//! let point = MonitoringPoint::new("P1")
//!     .with_group("North wall")
//!     .with_threshold("T-settlement");
//!
//! let t = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .and_then(|d| d.and_hms_opt(8, 0, 0))
//!     .unwrap();
//! let zero = Observation::new("P1", t, Displacement::new(0.0, 0.0, 0.0)).zero();
//!
//! let threshold = AlarmThreshold::new("T-settlement")
//!     .component("height", Band::new(-0.02, 0.02), Band::new(-0.06, 0.06));
//!
//! assert_eq!(point.thresholds, vec!["T-settlement".to_string()]);
//! assert!(zero.is_zero);
//! assert!(threshold.bands("height").is_some());
//! ```
//!
//! ## Schema Version
//!
//! The current import schema version is **1**.

mod observation;
mod point;
mod range;
mod reading;
mod threshold;
mod version;

pub use observation::*;
pub use point::*;
pub use range::*;
pub use reading::*;
pub use threshold::*;
pub use version::*;

/// Current import schema version.
///
/// Increment this when making breaking changes to the import document format.
pub const SCHEMA_VERSION: u32 = 1;
